//! Parameter listing command.

use clap::Args;
use stretta_core::ParameterInfo;
use stretta_dynamics::Compressor;

#[derive(Args)]
pub struct ParamsArgs {}

pub fn run(_args: ParamsArgs) -> anyhow::Result<()> {
    let comp = Compressor::new(48000.0);

    println!("Compressor parameters:");
    println!(
        "  {:<16} {:>10} {:>10} {:>10}",
        "Name", "Min", "Max", "Default"
    );
    for i in 0..comp.param_count() {
        if let Some(desc) = comp.param_info(i) {
            println!(
                "  {:<16} {:>10} {:>10} {:>10}",
                desc.name,
                format!("{}{}", desc.min, desc.unit.suffix()),
                format!("{}{}", desc.max, desc.unit.suffix()),
                format!("{}{}", desc.default, desc.unit.suffix()),
            );
        }
    }
    Ok(())
}
