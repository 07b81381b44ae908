fn main() {
    if let Err(err) = tablescout_lib::run() {
        eprintln!("tablescout: {}", err);
        std::process::exit(1);
    }
}
