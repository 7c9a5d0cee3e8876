use anyhow::{Context, Result};
use ashram_core::{AshramClient, AshramConfig, ClientInfo, GuidanceTransport};
use ashram_handoff::FileMailbox;
use ashram_pages::compass::{CompassForm, CompassPage, SubmissionState};
use ashram_pages::qna::{self, QnaOutcome, QnaPage};
use dialoguer::{Input, Select};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::CompassArgs;
use crate::output::{
    emit_html, print_error, print_followup_hint, print_notice, spinner,
};

/// Everything a command needs, built once from the effective config
pub struct AppContext {
    client: AshramClient,
    client_info: ClientInfo,
    mailbox: FileMailbox,
    output: Option<PathBuf>,
}

impl AppContext {
    pub fn new(config: &AshramConfig, output: Option<PathBuf>) -> Result<Self> {
        let client = AshramClient::new(config).context("Failed to set up the HTTP client")?;
        let mailbox_dir = config
            .mailbox_dir()
            .context("Failed to locate the mailbox directory")?;
        info!("Using endpoint {}", client.endpoint());
        debug!("Using mailbox in {}", mailbox_dir.display());

        Ok(Self {
            client,
            client_info: config.client_info(),
            mailbox: FileMailbox::new(mailbox_dir),
            output,
        })
    }
}

/// Runs the Q&A flow: take any pending prefill, get the question, submit, show the result
pub async fn run_ask(question: Option<String>, ctx: &AppContext) -> Result<()> {
    let mut page = QnaPage::load(ctx.client_info.clone(), &ctx.mailbox);

    match question {
        Some(question) => {
            if !page.question().is_empty() {
                print_notice("A pending follow-up question was replaced by the one given on the command line.");
            }
            page.set_question(question);
        }
        None => {
            let question: String = Input::new()
                .with_prompt("Your question")
                .with_initial_text(page.question())
                .allow_empty(true)
                .interact_text()
                .context("Failed to read question")?;
            page.set_question(question);
        }
    }

    let outcome = match page.begin() {
        Some(request) => {
            let waiting = spinner(qna::WAITING);
            let result = ctx.client.send(&request).await;
            waiting.finish_and_clear();
            page.finish(result)
        }
        None => QnaOutcome::MissingQuestion,
    };

    match outcome {
        QnaOutcome::MissingQuestion => print_error(qna::EMPTY_QUESTION),
        QnaOutcome::ConnectionProblem => print_error(qna::CONNECTION_PROBLEM),
        QnaOutcome::Unavailable => print_error(qna::UNAVAILABLE),
        QnaOutcome::Answered { .. } => {}
    }

    emit_html(page.output(), ctx.output.as_deref())
}

/// Runs the decision-compass flow and, if asked, queues a verse follow-up
pub async fn run_compass(args: CompassArgs, ctx: &AppContext) -> Result<()> {
    let form = CompassForm {
        situation: args.situation,
        life_area: args.life_area,
        emotion: args.emotion,
        desired_outcome: args.desired_outcome,
        constraints: args.constraints,
    };

    let mut page = CompassPage::new(ctx.client_info.clone());
    let state = match page.begin(&form) {
        Some(request) => {
            let loading = page
                .is_loading()
                .then(|| spinner("Consulting the decision compass..."));
            let result = ctx.client.send(&request).await;
            if let Some(loading) = loading {
                loading.finish_and_clear();
            }
            page.finish(result)
        }
        None => page.state(),
    };

    if state != SubmissionState::Rendered {
        if let Some(message) = page.error() {
            print_error(message);
        }
        return Ok(());
    }

    emit_html(page.result_html(), ctx.output.as_deref())?;

    let Some(index) = pick_verse(&page, args.follow_up, args.interactive)? else {
        return Ok(());
    };
    if let Some(navigation) = page.ask_deeper(index, &ctx.mailbox) {
        debug!("Follow-up targets {}", navigation.target);
        print_followup_hint(&navigation.question);
    }
    Ok(())
}

/// Verse index (0-based) to follow up on, from `--follow-up` or the interactive picker
fn pick_verse(page: &CompassPage, follow_up: Option<usize>, interactive: bool) -> Result<Option<usize>> {
    let verses = page.view().map(|view| view.verses()).unwrap_or_default();
    if verses.is_empty() {
        if follow_up.is_some() || interactive {
            print_notice("The guidance contains no verses to follow up on.");
        }
        return Ok(None);
    }

    if let Some(n) = follow_up {
        if n == 0 || n > verses.len() {
            print_error(&format!(
                "There is no verse {}; choose between 1 and {}.",
                n,
                verses.len()
            ));
            return Ok(None);
        }
        return Ok(Some(n - 1));
    }

    if !interactive {
        return Ok(None);
    }

    let mut items: Vec<String> = verses
        .iter()
        .enumerate()
        .map(|(i, verse)| {
            verse
                .reference
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| format!("Verse {}", i + 1))
        })
        .collect();
    items.push("Done".to_string());

    let choice = Select::new()
        .with_prompt(ashram_pages::sections::DEEPER_EXPLANATION_LABEL)
        .items(&items)
        .default(items.len() - 1)
        .interact()
        .context("Failed to read selection")?;

    Ok((choice < verses.len()).then_some(choice))
}

/// Writes the default config to `path` unless a file is already there
pub fn run_init_config(path: &Path) -> Result<()> {
    if path.exists() {
        print_notice(&format!("Config already exists at {}", path.display()));
        return Ok(());
    }

    AshramConfig::default()
        .save_to_file(path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    eprintln!("Created config at {}", path.display());
    Ok(())
}
