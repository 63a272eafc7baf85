use log::debug;
use spritely::rom::Rom;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("spritely - SNES ROM inspector for the sprite insertion core");
        println!();
        println!("Usage: {} <rom.smc>", args[0]);
        println!();
        println!("Prints the detected mapper, image sizes, and the Lunar Magic");
        println!("version stamped into the ROM, if any.");
        return Ok(());
    }

    debug!("Inspecting ROM: {}", args[1]);
    let rom = Rom::open(&args[1])?;

    println!("File:         {}", rom.name().display());
    println!("Mapper:       {:?}", rom.mapper());
    println!("Header size:  {} bytes", rom.header_size());
    println!("Payload size: {} bytes", rom.size());
    match rom.lm_version() {
        Some(version) => println!(
            "Lunar Magic:  {} (extended levels: {})",
            version,
            rom.is_exlevel()
        ),
        None => println!("Lunar Magic:  version bytes not reachable"),
    }

    Ok(())
}
