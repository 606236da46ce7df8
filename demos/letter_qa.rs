use dotenv::dotenv;
use fund_insights::llm::{InsightAssistant, LlmClient};
use fund_insights::{prompts, DirectoryStore, FundIdentifier, InsightCatalog, InsightConfig};
use std::error::Error;
use std::io::{self, Write};

fn selected_letters() -> Result<Vec<FundIdentifier>, Box<dyn Error>> {
    let fund = std::env::var("FUND_NAME")?;
    let quarters = std::env::var("FUND_QUARTERS")?;

    let identifiers = quarters
        .split(',')
        .map(|quarter| FundIdentifier::parse(&format!("{} {}", fund, quarter.trim())))
        .collect::<Result<Vec<_>, _>>()?;

    if identifiers.is_empty() {
        return Err("FUND_QUARTERS must list at least one quarter".into());
    }

    Ok(identifiers)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let config = InsightConfig::from_env()?;

    println!("💬 Starting partner letter Q&A...\n");

    let catalog = InsightCatalog::new(DirectoryStore::from_config(&config.storage), &config.storage);
    let assistant = InsightAssistant::new(LlmClient::from_config(&config.llm)?);

    let identifiers = selected_letters()?;
    let fund = identifiers[0].fund_name.clone();
    let corpus = catalog.letter_corpus(&identifiers)?;
    if corpus.included.is_empty() {
        return Err(format!("No letters found for {} under {}", fund, config.storage.root.display()).into());
    }
    println!("✅ Loaded {} of {} letters.\n", corpus.included.len(), identifiers.len());

    println!("🤖 Ready! Ask questions about {} (type 'quit' to exit).", fund);
    println!("------------------------------------------------------------------");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let question = input.trim();

        if question.eq_ignore_ascii_case("quit") || question.eq_ignore_ascii_case("exit") {
            break;
        }

        if question.is_empty() {
            continue;
        }

        println!("\nThinking...");

        let bundle = prompts::fund_question(&fund, question, corpus.corpus.clone());
        match assistant.answer(&bundle).await {
            Ok(response) => {
                println!("\n{}\n", response);
                println!("------------------------------------------------------------------");
            }
            Err(e) => {
                eprintln!("❌ Error: {}", e);
            }
        }
    }

    Ok(())
}
