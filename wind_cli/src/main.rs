//! # Gale CLI
//!
//! Runs one wind load calculation and prints the zone table followed by the
//! full result as JSON.
//!
//! ```text
//! wind_cli [input.json|-] [terrain]
//! ```
//!
//! The input file holds either a tagged `CalculationItem` or a stored
//! `CalculationRecord`. Without a file (or with `-`) a built-in duo-pitch
//! demo runs. An optional terrain category (`0`-`IV`, or `0`-`4`) overrides
//! the site's terrain.
//! Set `RUST_LOG=debug` to see policy selection and clamping.

use std::fs;
use std::process;

use log::{error, info};

use wind_core::calculations::{CalculationItem, DuoPitchInput, WindLoadResult};
use wind_core::coefficients::InternalPressure;
use wind_core::combination::MemberSpacing;
use wind_core::environment::WindSite;
use wind_core::record::CalculationRecord;
use wind_core::terrain::{Orography, TerrainCategory};
use wind_core::{CalcError, CalcResult};

/// Duo-pitch hall on a gentle slope, Vb0 = 22 m/s, terrain III.
fn demo_item() -> CalculationItem {
    let mut site = WindSite::new(22.0, TerrainCategory::III);
    site.orography = Orography::UpwindSlope {
        upwind_slope: 0.1,
        location_factor: 0.3,
    };
    CalculationItem::DuoPitch(DuoPitchInput {
        label: "Demo hall".to_string(),
        site,
        height_m: 7.5,
        width_m: 12.0,
        length_m: 30.0,
        pitch_deg: 15.0,
        structural_factor: 1.0,
        internal_pressure: InternalPressure::Specified { c_pi: -0.3 },
        member_spacing: Some(MemberSpacing {
            purlin_spacing_m: 1.2,
            truss_spacing_m: 5.0,
        }),
    })
}

fn load_item(path: &str) -> CalcResult<CalculationItem> {
    let json = fs::read_to_string(path)
        .map_err(|e| CalcError::invalid_input("input_file", path, e.to_string()))?;
    parse_item(&json)
}

/// A tagged item carries `type`, a stored record wraps one under `item`.
fn parse_item(json: &str) -> CalcResult<CalculationItem> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("type").is_some() {
        Ok(serde_json::from_value(value)?)
    } else if value.get("item").is_some() {
        info!("input is a stored record");
        Ok(CalculationRecord::from_json(json)?.item)
    } else {
        Err(CalcError::missing_field("type"))
    }
}

fn apply_terrain(item: &mut CalculationItem, code: Option<&str>) -> CalcResult<()> {
    if let Some(code) = code {
        let terrain = TerrainCategory::from_str_flexible(code)?;
        info!("terrain overridden to {}", terrain);
        item.site_mut().terrain = terrain;
    }
    Ok(())
}

fn print_result(item: &CalculationItem, result: &WindLoadResult) {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  {} - {}", item.shape().display_name(), item.label());
    println!("═══════════════════════════════════════════════════════════════════");
    println!();
    println!(
        "  ρ = {:.3} kg/m³   v_b = {:.2} m/s   q_b = {:.4} kN/m²",
        result.site.rho_kg_m3, result.site.v_b_ms, result.site.q_b_kpa
    );
    for exposure in &result.exposure {
        println!(
            "  z_e = {:.3} m   c_r = {:.4}   v_m = {:.2} m/s   q_p = {:.4} kN/m²",
            exposure.segment.z_e_m, exposure.c_r, exposure.v_m_ms, exposure.q_p_kpa
        );
    }
    println!("  e = {:.3} m   C_pi candidates = {:?}", result.characteristic_length_m, result.internal.candidates);
    println!();
    println!(
        "  {:<4} {:<6} {:>9} {:>8} {:>7} {:>7} {:>9} {:>9} {:>9}",
        "Zone", "θ", "Area m²", "q_p", "C_pe", "C_pi", "W_e", "W_net", "F_w kN"
    );
    for zone in &result.zones {
        let direction = zone.direction.map_or("-", |d| d.display_name());
        println!(
            "  {:<4} {:<6} {:>9.3} {:>8.4} {:>7.3} {:>7.3} {:>9.4} {:>9.4} {:>9.3}",
            zone.zone.label(),
            direction,
            zone.area_m2,
            zone.q_p_kpa,
            zone.c_pe,
            zone.c_pi,
            zone.w_e_kpa,
            zone.w_net_kpa,
            zone.f_w_kn
        );
    }
    println!();
    println!(
        "  max W_net = {:.4} kN/m²   min W_net = {:.4} kN/m²",
        result.max_positive_w_net_kpa, result.min_negative_w_net_kpa
    );
    if let Some(governing) = result.governing_zone() {
        println!(
            "  governing: zone {} {} W_net = {:.4} kN/m²",
            governing.zone.label(),
            governing.direction.map_or("", |d| d.display_name()),
            governing.w_net_kpa
        );
    }

    if let Some(transfer) = &result.load_transfer {
        println!();
        println!("  Load transfer ({})", transfer.direction.display_name());
        for member in &transfer.members {
            println!(
                "  {:<4} W_e = {:>8.4} kN/m²   purlin = {:>8.4} kN/m   truss = {:>8.4} kN",
                member.zone.label(),
                member.w_e_kpa,
                member.purlin_kn_m,
                member.truss_kn
            );
        }
    }
    println!();
}

fn run(path: Option<&str>, terrain: Option<&str>) -> CalcResult<()> {
    let mut item = match path {
        Some(path) if path != "-" => load_item(path)?,
        _ => {
            info!("no input file given, running demo configuration");
            demo_item()
        }
    };
    apply_terrain(&mut item, terrain)?;

    let result = item.calculate()?;
    print_result(&item, &result);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = args.first().map(String::as_str);
    let terrain = args.get(1).map(String::as_str);
    if let Err(err) = run(path, terrain) {
        if !err.is_user_correctable() {
            error!("{} [{}]", err, err.error_code());
        }
        match serde_json::to_string_pretty(&err) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", err),
        }
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_item() {
        let json = serde_json::to_string(&demo_item()).unwrap();
        assert_eq!(parse_item(&json).unwrap(), demo_item());
    }

    #[test]
    fn test_parse_stored_record() {
        let record = CalculationRecord::new(Some("Hall".to_string()), demo_item());
        let item = parse_item(&record.to_json().unwrap()).unwrap();
        assert_eq!(item, demo_item());
    }

    #[test]
    fn test_parse_untagged_input_reports_missing_type() {
        let err = parse_item(r#"{ "label": "Hall", "height_m": 7.5 }"#).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
        assert!(err.is_user_correctable());
    }

    #[test]
    fn test_terrain_override() {
        let mut item = demo_item();
        apply_terrain(&mut item, Some("iv")).unwrap();
        assert_eq!(item.site_mut().terrain, TerrainCategory::IV);
        apply_terrain(&mut item, Some("2")).unwrap();
        assert_eq!(item.site_mut().terrain, TerrainCategory::II);
        apply_terrain(&mut item, None).unwrap();
        assert_eq!(item.site_mut().terrain, TerrainCategory::II);
    }

    #[test]
    fn test_unknown_terrain_rejected() {
        let mut item = demo_item();
        assert!(apply_terrain(&mut item, Some("V")).is_err());
    }
}
