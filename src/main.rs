use dalton_reader::{InterfaceFile, ReaderConfig, Width, list_labels_with, read_property_matrix_with};
use std::env;
use std::process;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} [OPTIONS] <SIRIFC>", program);
    eprintln!("       {} [OPTIONS] --prop <LABEL> <NBAST> <AOPROPER>", program);
    eprintln!("       {} [OPTIONS] --labels <FILE>", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --marker-width <4|8>   record length marker width (default 4)");
    eprintln!("  --int-width <4|8>      integer width inside records (default 4)");
    process::exit(1);
}

/// Removes `flag <value>` from `args` and parses the value as a width.
fn take_width(args: &mut Vec<String>, flag: &str) -> Width {
    let Some(idx) = args.iter().position(|arg| arg == flag) else {
        return Width::default();
    };
    let Some(value) = args.get(idx + 1).cloned() else {
        eprintln!("ERROR: {} flag requires an argument.", flag);
        process::exit(1);
    };
    args.drain(idx..idx + 2);
    match value.parse::<usize>().map_err(|_| ()).and_then(|n| Width::try_from(n).map_err(|_| ())) {
        Ok(width) => width,
        Err(()) => {
            eprintln!("ERROR: {} must be 4 or 8, got '{}'", flag, value);
            process::exit(1);
        }
    }
}

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "dalton-reader".to_string());

    let marker_width = take_width(&mut args, "--marker-width");
    let integer_width = take_width(&mut args, "--int-width");
    let config = ReaderConfig::new(marker_width, integer_width);

    if args.len() < 2 {
        usage(&program);
    }

    let result = match args[1].as_str() {
        "--prop" => {
            let (Some(label), Some(nbast), Some(path)) = (args.get(2), args.get(3), args.get(4)) else {
                usage(&program);
            };
            let Ok(nbast) = nbast.parse::<usize>() else {
                eprintln!("ERROR: NBAST must be a non-negative integer, got '{}'", nbast);
                process::exit(1);
            };
            read_property_matrix_with(nbast, label, path, config).map(|prop| {
                println!("{} ({:?}, {})", prop.label.name, prop.symmetry, prop.label.stamp);
                println!("{}", prop.matrix);
            })
        }
        "--labels" => {
            let Some(path) = args.get(2) else {
                usage(&program);
            };
            list_labels_with(path, config).map(|labels| {
                for label in &labels {
                    println!("{:<8}  {:<8}  {}", label.name, label.tag, label.stamp);
                }
                println!("{} labels", labels.len());
            })
        }
        path => InterfaceFile::open_with(path, config).map(|ifc| print!("{}", ifc)),
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }
}
