use alias_launcher::{Launcher, LauncherConfig, logging};

fn main() {
    logging::init("warn");

    let launched = LauncherConfig::baked()
        .and_then(|config| Launcher::new(&config))
        .and_then(|launcher| launcher.launch(std::env::args_os().skip(1)));

    let code = match launched {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            tracing::error!("{:#}", anyhow::Error::new(err));
            code
        }
    };
    std::process::exit(code);
}
