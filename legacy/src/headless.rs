//! Line-oriented interview runner.
//!
//! Reads one line at a time from stdin. Lines starting with `#` are
//! commands; anything else answers the current question.

use async_trait::async_trait;
use legacy_core::narration::{NarrationError, NarrationRequest, Narrator};
use legacy_core::persist::{JsonDirStore, PhotoLibrary, StoryLibrary};
use legacy_core::{HeadlessError, HeadlessInterview, InterviewEngine, LegacyStory, Photo};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Where to keep data and which photo to open with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub photo_id: Option<String>,
}

/// Prints the story script to stdout in place of speech.
struct ConsoleNarrator;

#[async_trait]
impl Narrator for ConsoleNarrator {
    async fn narrate(&self, request: &NarrationRequest) -> Result<(), NarrationError> {
        print_script(request)?;
        Ok(())
    }
}

fn print_script(request: &NarrationRequest) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "[NARRATION]")?;
    for line in request.script().lines() {
        writeln!(stdout, "  {line}")?;
    }
    stdout.flush()
}

type Interview = HeadlessInterview<Arc<JsonDirStore>>;

/// Run interviews until stdin closes or `#quit`.
pub async fn run_headless(config: RunConfig) -> Result<(), HeadlessError> {
    let store = Arc::new(JsonDirStore::new(&config.data_dir));
    let photos = PhotoLibrary::new(Arc::clone(&store));
    let mut interview = HeadlessInterview::new(
        InterviewEngine::default(),
        StoryLibrary::new(Arc::clone(&store)),
    )
    .with_narrator(ConsoleNarrator);

    tracing::info!(data_dir = %config.data_dir.display(), "Starting interview runner");

    println!("=== Legacy Stories ===");
    println!("Data: {}", config.data_dir.display());
    println!();
    print_help();
    println!();

    match config.photo_id.as_deref() {
        Some(id) => start_photo(&mut interview, &photos, id).await,
        None => {
            list_photos(&photos).await;
            println!("Choose a photo with #photo <id>.");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('#') {
            let parts: Vec<&str> = command.split_whitespace().collect();
            match parts.first().copied() {
                Some("quit") | Some("exit") => {
                    println!("Goodbye!");
                    break;
                }
                Some("photos") => list_photos(&photos).await,
                Some("photo") => match parts.get(1) {
                    Some(id) => start_photo(&mut interview, &photos, id).await,
                    None => println!("[ERROR] Usage: #photo <id>"),
                },
                Some("status") => print_status(&interview),
                Some("stories") => list_stories(&interview).await,
                Some("help") => print_help(),
                _ => println!("[ERROR] Unknown command. Type #help for help."),
            }
            stdout.flush().ok();
            continue;
        }

        match interview.answer(line, None) {
            Ok(turn) => {
                println!("[PROGRESS] {:.0}%", turn.progress);
                match turn.next_question {
                    Some(question) => println!("[QUESTION] {}", question.prompt),
                    None => finish(&mut interview).await,
                }
            }
            Err(HeadlessError::NoActiveSession) => {
                println!("[ERROR] No interview in progress. Choose a photo with #photo <id>.");
            }
            Err(e) => println!("[ERROR] {e}"),
        }
        stdout.flush().ok();
    }

    Ok(())
}

async fn start_photo(
    interview: &mut Interview,
    photos: &PhotoLibrary<Arc<JsonDirStore>>,
    id: &str,
) {
    let Some(photo) = photos.photo_by_id(id).await else {
        println!("[ERROR] No photo with id {id}. Type #photos to list them.");
        return;
    };

    println!("[PHOTO] {}", describe(&photo));
    match interview.start(photo).map(|q| q.prompt.clone()) {
        Some(prompt) => println!("[QUESTION] {prompt}"),
        None => finish(interview).await,
    }
}

async fn finish(interview: &mut Interview) {
    match interview.finish().await {
        Ok(story) => print_story(&story),
        Err(e) => println!("[ERROR] Could not save the story: {e}"),
    }
}

fn print_story(story: &LegacyStory) {
    println!("[STORY] {}", story.title);
    for para in story.paragraphs() {
        println!("{para}");
        println!();
    }
    println!(
        "[SAVED] {} words, about {}s to read. Tags: {}",
        story.metadata.word_count,
        story.metadata.duration_secs,
        story
            .metadata
            .tags
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );
}

fn print_status(interview: &Interview) {
    match interview.session() {
        Some(session) => {
            println!("[STATUS]");
            println!("  Photo: {}", describe(session.photo()));
            println!(
                "  Answered: {}/{}",
                session.responses().len(),
                session.questions().len()
            );
            println!("  Progress: {:.0}%", interview.progress());
            if let Some(question) = interview.current_question() {
                println!("  Current question: {}", question.prompt);
            }
        }
        None => println!("[STATUS] No interview in progress."),
    }
}

async fn list_photos(photos: &PhotoLibrary<Arc<JsonDirStore>>) {
    println!("[PHOTOS]");
    for photo in photos.all_photos().await {
        println!("  {:<12} {}", photo.id, describe(&photo));
    }
}

async fn list_stories(interview: &Interview) {
    let library = interview.library();
    match (library.list_stories().await, library.stats().await) {
        (Ok(stories), Ok(stats)) => {
            println!(
                "[STORIES] {} saved, {} words, {}s of listening",
                stats.story_count, stats.total_words, stats.total_duration_secs
            );
            for story in stories {
                println!("  {} ({})", story.title, story.created_at.format("%Y-%m-%d"));
            }
        }
        (Err(e), _) | (_, Err(e)) => println!("[ERROR] Could not read stories: {e}"),
    }
}

fn describe(photo: &Photo) -> String {
    let mut text = photo.description().unwrap_or("Untitled photo").to_string();
    if let Some(year) = photo.year() {
        text.push_str(&format!(" ({year})"));
    }
    text
}

fn print_help() {
    println!("Commands:");
    println!("  #photos      - List photos");
    println!("  #photo <id>  - Start an interview about a photo");
    println!("  #status      - Show interview progress");
    println!("  #stories     - List saved stories");
    println!("  #help        - Show this help");
    println!("  #quit        - Exit");
    println!("  (anything else answers the current question)");
}
