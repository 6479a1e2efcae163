use std::{
  io::{self, IsTerminal},
  process::ExitCode,
};

use switchoff::{app::App, logging::init_tracing, system_session_control, Config};
use tracing::error;

fn main() -> ExitCode {
  let config = match Config::load() {
    Ok(config) => config,
    Err(e) => {
      eprintln!("switchoff: {}", e);
      return ExitCode::FAILURE;
    }
  };

  if let Err(e) = init_tracing(&config.log_level) {
    eprintln!("switchoff: {}", e);
  }

  let control = system_session_control(&config);
  let mut app = App::startup(config, control).with_color(io::stdout().is_terminal());

  let result = app.run(io::stdin().lock(), io::stdout().lock());
  app.teardown();

  match result {
    Ok(exit) => ExitCode::from(exit.code()),
    Err(e) => {
      error!("{}", e);
      ExitCode::FAILURE
    }
  }
}
