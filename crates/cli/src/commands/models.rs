//! `codequill models` — List the model catalog.

use crate::commands::build_assistant;

pub async fn run(model: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = build_assistant(model)?;
    let current = assistant.current_model();

    println!("Available models:\n");
    for id in assistant.list_models().iter() {
        if *id == current {
            println!("  * {id}   (selected)");
        } else {
            println!("    {id}");
        }
    }
    println!();

    Ok(())
}
