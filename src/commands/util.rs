use super::{CommandResult, Flow};
use rust_i18n::t;

/// List the available console commands
pub fn help() -> CommandResult {
    println!("{}", t!("console_help"));
    Ok(Flow::Continue)
}
