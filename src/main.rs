extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use std::{env, process};

fn main() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();
    info!("starting datboi");

    let result = datboi::engine()
        .build()
        .and_then(|(engine, event_loop)| engine.run(event_loop));

    if let Err(err) = result {
        error!("{:#}", err);
        process::exit(-1);
    }
}
