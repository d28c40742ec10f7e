use super::args::{Args, Command};
use crate::api::types::{ChatCompletionRequest, Message, ModelFilter};
use crate::api::{ChatClient, OpenRouterClient};
use crate::core::{OpenRouterError, Settings};
use colored::Colorize;
use futures::StreamExt;
use log::debug;
use std::io::{self, Write};

pub async fn run(args: Args) -> Result<(), OpenRouterError> {
    let settings = Settings::load()?;
    let client = OpenRouterClient::new(settings.client_config()?);
    debug!("[SETTINGS] {:?}", client.config());

    match args.command {
        Command::Chat {
            query,
            model,
            system,
            no_stream,
        } => {
            let request = build_chat_request(&settings, query, model, system);
            let mut stdout = io::stdout();
            if no_stream {
                chat(&client, request, &mut stdout).await
            } else {
                chat_streaming(&client, request, &mut stdout).await
            }
        }
        Command::Models { category } => {
            let filter = ModelFilter {
                category,
                ..Default::default()
            };
            let models = client.list_models(filter).await?;
            for model in models {
                let price = model
                    .pricing
                    .map(|p| format!("prompt {} / completion {}", p.prompt, p.completion))
                    .unwrap_or_default();
                println!("{}  {}", model.id.bold(), price.dimmed());
            }
            Ok(())
        }
        Command::Key => {
            let key = client.current_key().await?;
            let limit = key
                .limit
                .map_or_else(|| "unlimited".to_string(), |limit| limit.to_string());
            println!("{} {}", "label:".bold(), key.label);
            println!("{} {}", "usage:".bold(), key.usage);
            println!("{} {limit}", "limit:".bold());
            println!("{} {}", "free tier:".bold(), key.is_free_tier);
            Ok(())
        }
    }
}

/// Combines CLI flags with the configured defaults.
pub fn build_chat_request(
    settings: &Settings,
    query: String,
    model: Option<String>,
    system: Option<String>,
) -> ChatCompletionRequest {
    let mut messages = Vec::new();
    if let Some(prompt) = system.or_else(|| settings.system_prompt.clone()) {
        messages.push(Message::system(prompt));
    }
    messages.push(Message::user(query));

    ChatCompletionRequest {
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
        ..ChatCompletionRequest::new(
            model.unwrap_or_else(|| settings.default_model.clone()),
            messages,
        )
    }
}

async fn chat<W: Write + Send>(
    client: &dyn ChatClient,
    request: ChatCompletionRequest,
    writer: &mut W,
) -> Result<(), OpenRouterError> {
    let response = client.chat(request).await?;
    writeln!(writer, "{}", response.content().unwrap_or_default())?;
    Ok(())
}

async fn chat_streaming<W: Write + Send>(
    client: &dyn ChatClient,
    request: ChatCompletionRequest,
    writer: &mut W,
) -> Result<(), OpenRouterError> {
    let mut stream = client.chat_stream(request).await?;
    while let Some(fragment) = stream.next().await {
        write!(writer, "{fragment}")?;
        writer.flush()?;
    }
    // Ensure final newline
    writeln!(writer)?;
    Ok(())
}
