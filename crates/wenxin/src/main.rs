//! A simple program demonstrates how to use `wenxin` as a library.

#[macro_use]
extern crate tracing;

use std::io::Write as _;

use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use wenxin::{ChatOptions, ErnieClient, LogTracer, Message};

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = match ErnieClient::from_env() {
        Ok(client) => client.with_tracer(LogTracer),
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    println!(
        "{}",
        format!("Chatting with {}, Ctrl-D to quit.", client.variant().name)
            .dimmed()
    );

    let mut input = BufReader::new(io::stdin()).lines();
    let mut history = Vec::new();

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut input).await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        history.push(Message::user(line));

        print!("{}🤖 ", BAR_CHAR.bright_cyan());
        let mut reply = String::new();
        let result = client
            .stream_request(
                &history,
                |chunk| {
                    print!("{}", chunk.bright_white());
                    std::io::stdout().flush().ok();
                    reply.push_str(&chunk);
                },
                ChatOptions::default(),
            )
            .await;
        println!();

        match result {
            Ok(()) => history.push(Message::assistant(reply)),
            Err(err) => {
                println!("{}⚠️  {}", BAR_CHAR.bright_red(), err.red());
                // Keep the conversation alternating for the next turn.
                history.pop();
            }
        }
        println!();
    }
}

async fn read_line(input: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match input.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
