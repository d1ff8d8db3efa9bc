use log::error;
use smart_recipe_analyzer::{
    client_from_config, AnalyzerConfig, Fragment, RecipeService, ViewController,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands:
  add <ingredient>   add an ingredient
  remove <number>    remove the ingredient at that position
  list               show ingredients and recipes
  find               ask for recipes using your ingredients
  clear              clear everything
  health             check the recipe service
  quit               exit";

fn print_view<S: RecipeService>(view: &ViewController<S>) {
    if view.ingredients().is_empty() {
        println!("Add some ingredients to get started! Try \"chicken\", \"rice\", \"broccoli\"...");
    } else {
        for (position, ingredient) in view.ingredients().iter().enumerate() {
            println!("  {}. {}", position + 1, ingredient.name);
        }
    }

    let fragments = view.fragments();
    if !fragments.is_empty() {
        println!();
        if let Some(message) = view.service_message() {
            println!("{}", message);
        }
        println!("{}", view.using_line());
        for fragment in &fragments {
            println!();
            match fragment {
                Fragment::Card(_) => println!("{}", fragment),
                Fragment::Error { .. } => eprintln!("{}", fragment),
            }
        }
    }

    println!();
    println!("[{}]", view.status());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AnalyzerConfig::load()?;
    let mut view = ViewController::new(client_from_config(&config)?);

    println!("Smart Recipe Analyzer ({})", config.endpoint);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, argument) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => continue,
            "add" => {
                view.set_input(argument);
                if !view.add() {
                    println!("Nothing added (empty or already in the list)");
                }
                print_view(&view);
            }
            "remove" => {
                let removed = argument
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|position| *position > 0)
                    .and_then(|position| view.remove(position - 1));
                match removed {
                    Some(_) => print_view(&view),
                    None => println!("No ingredient at position '{}'", argument.trim()),
                }
            }
            "list" => print_view(&view),
            "find" => {
                println!("Analyzing ingredients...");
                if let Err(e) = view.submit().await {
                    error!("Recipe request failed: {}", e);
                }
                print_view(&view);
            }
            "clear" => {
                view.clear_all();
                print_view(&view);
            }
            "health" => match view.health().await {
                Ok(health) => println!(
                    "{}: {} (AI enabled: {})",
                    health.service, health.status, health.ai_enabled
                ),
                Err(e) => println!("{}", e.user_message()),
            },
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. Type 'help' for commands.", other),
        }
    }

    Ok(())
}
