mod cli;
mod demo;
mod jobs;

use ride_compat::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
