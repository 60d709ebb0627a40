use crate::prelude::{println, *};
use vibeshift_core::samples::ExampleLibrary;
use vibeshift_core::types::ProgrammingLanguage;

#[derive(Debug, clap::Parser)]
#[command(name = "samples")]
#[command(about = "Built-in code samples, one per language")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List every sample
    #[clap(name = "list")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the sample for a language
    #[clap(name = "show")]
    Show {
        /// Language of the sample
        #[arg(value_parser = crate::client::parse_language)]
        language: ProgrammingLanguage,
    },
}

pub async fn run(app: App, _global: crate::Global) -> Result<()> {
    let library = ExampleLibrary::builtin();

    match app.command {
        Commands::List { json } => list(&library, json),
        Commands::Show { language } => {
            println!("{}", library.get(language));
            Ok(())
        }
    }
}

fn list(library: &ExampleLibrary, json: bool) -> Result<()> {
    if json {
        let samples: Vec<_> = library.iter().collect();
        println!("{}", serde_json::to_string_pretty(&samples)?);
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Language", "Editor", "Lines", "First line"]);

    for example in library.iter() {
        let language = example.language;
        let editor = example.editor_language;
        let lines = example.code.lines().count();
        let first = example.code.lines().next().unwrap_or_default();
        table.add_row(prettytable::row![language, editor, lines, first]);
    }

    table.printstd();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_show_accepts_language_aliases() {
        let app = App::try_parse_from(["samples", "show", "golang"]).unwrap();
        assert!(matches!(
            app.command,
            Commands::Show {
                language: ProgrammingLanguage::Go
            }
        ));
    }

    #[test]
    fn test_show_rejects_unknown_language() {
        assert!(App::try_parse_from(["samples", "show", "cobol"]).is_err());
    }

    #[test]
    fn test_list_json_flag() {
        let app = App::try_parse_from(["samples", "list", "--json"]).unwrap();
        assert!(matches!(app.command, Commands::List { json: true }));
    }
}
