//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use serde::Serialize;
use vonic_core::ParamScale;
use vonic_engine::EqParam;

#[derive(Args)]
pub struct ParamsArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ParamRow {
    id: u32,
    string_id: &'static str,
    name: &'static str,
    short_name: &'static str,
    unit: &'static str,
    min: f32,
    max: f32,
    default: f32,
    logarithmic: bool,
    stepped: bool,
}

fn rows() -> Vec<ParamRow> {
    EqParam::ALL
        .iter()
        .map(|p| {
            let d = p.descriptor();
            ParamRow {
                id: d.id.0,
                string_id: d.string_id,
                name: d.name,
                short_name: d.short_name,
                unit: d.unit.suffix().trim(),
                min: d.min,
                max: d.max,
                default: d.default,
                logarithmic: d.scale == ParamScale::Logarithmic,
                stepped: d.is_stepped(),
            }
        })
        .collect()
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let rows = rows();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Equalizer Parameters");
    println!("====================");
    println!();
    println!(
        "  {:4}  {:22}  {:20}  {:>9}  {:>18}  {}",
        "ID", "Key", "Name", "Default", "Range", "Unit"
    );
    println!(
        "  {:4}  {:22}  {:20}  {:>9}  {:>18}  {}",
        "--", "---", "----", "-------", "-----", "----"
    );
    for row in &rows {
        let range = format!("{} .. {}", row.min, row.max);
        println!(
            "  {:4}  {:22}  {:20}  {:>9}  {:>18}  {}",
            row.id, row.string_id, row.name, row.default, range, row.unit
        );
    }
    println!();
    println!("Slopes are indices 0..3 (12, 24, 36, 48 dB/oct); on the command line");
    println!("pass --low-slope / --high-slope in dB/oct.");

    Ok(())
}
