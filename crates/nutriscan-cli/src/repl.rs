//! Interactive follow-up chat.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use nutriscan_analyzer::FollowUpChat;
use nutriscan_domain::traits::LlmProvider;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::fmt::Display;
use std::path::Path;

/// Chat loop input.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Exit,
    Help,
    History,
    Question(&'a str),
}

/// Run the follow-up chat until the user leaves.
pub async fn run_chat<L>(
    chat: &mut FollowUpChat<L>,
    formatter: &Formatter,
    history_path: &Path,
    history_size: usize,
) -> Result<()>
where
    L: LlmProvider,
    L::Error: Display,
{
    if let Some(greeting) = chat.messages().first() {
        println!();
        println!("{}", formatter.chat_reply(&greeting.text));
        println!("{}", formatter.info("Type 'help' for commands, 'exit' to quit"));
    }

    let editor_config = EditorConfig::builder()
        .max_history_size(history_size)
        .map_err(|e| CliError::Config(format!("Invalid history size: {}", e)))?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;
    let _ = editor.load_history(history_path);

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let Some(input) = parse_chat_input(&line) else {
                    continue;
                };
                editor.add_history_entry(line.trim()).ok();

                match input {
                    ChatInput::Exit => break,
                    ChatInput::Help => print_help(formatter),
                    ChatInput::History => {
                        for message in chat.messages() {
                            println!("{}: {}", message.sender.label(), formatter.render_emphasis(&message.text));
                        }
                    }
                    ChatInput::Question(question) => match chat.ask(question).await {
                        Ok(reply) => println!("{}", formatter.chat_reply(&reply)),
                        Err(e) => eprintln!(
                            "{}",
                            formatter.error(&format!("Failed to get response from AI: {}", e))
                        ),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    editor.save_history(history_path).ok();

    Ok(())
}

fn parse_chat_input(line: &str) -> Option<ChatInput<'_>> {
    let line = line.trim();
    match line {
        "" => None,
        "exit" | "quit" | "q" => Some(ChatInput::Exit),
        "help" | "?" => Some(ChatInput::Help),
        "history" => Some(ChatInput::History),
        question => Some(ChatInput::Question(question)),
    }
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Ask anything about the analyzed label."));
    println!("  history   Show the conversation so far");
    println!("  help      Show this help");
    println!("  exit      Leave the chat");
}
