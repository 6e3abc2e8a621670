use crate::cli::Commands;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let (Commands::List { json, .. } | Commands::Show { json, .. } | Commands::Extract { json, .. }) =
        command;
    if *json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
