use anyhow::{Context, Result};
use biso_server::db::{repositories::PostRepository, Database};
use biso_server::ranking::{summarize_hashtags, PostRanker, TargetTag};
use biso_server::similarity::{MatchConfig, SimilarityMatcher, DEFAULT_SIMILARITY_THRESHOLD};
use biso_types::{HashtagFeedResponse, Post, RankedPost};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Ya Biso hashtag feed tool
///
/// Runs the hashtag matching and ranking pipeline offline, against a feed
/// database or a JSON export of posts.
#[derive(Parser, Debug)]
#[command(name = "biso-feed")]
#[command(about = "Rank Ya Biso posts by hashtag", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ranked feed for a hashtag
    Rank {
        /// Hashtag, with or without the leading #
        tag: String,
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        matching: Matching,
        /// Print the feed as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the tags treated as the same topic as a hashtag
    Similar {
        tag: String,
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        matching: Matching,
    },
    /// Print every hashtag in the feed with its post count
    Tags {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Args, Debug)]
struct Source {
    /// Path to the SQLite feed database
    #[arg(short, long, default_value = "./biso.db", conflicts_with = "input")]
    database: String,

    /// JSON file holding an array of posts, used instead of the database
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct Matching {
    /// Similarity ratio a tag must exceed to match
    #[arg(short, long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD, env = "SIMILARITY_THRESHOLD")]
    threshold: f64,

    /// Disable substring containment matching
    #[arg(long)]
    no_substring: bool,
}

impl Matching {
    fn ranker(&self) -> Result<PostRanker> {
        let config = MatchConfig::new(self.threshold, !self.no_substring)?;
        Ok(PostRanker::new(SimilarityMatcher::new(config)))
    }
}

/// Read posts from a JSON export
fn load_posts_from_file(path: &Path) -> Result<Vec<Post>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let posts: Vec<Post> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse posts from {}", path.display()))?;
    Ok(posts)
}

/// Open an existing feed database and read every post
fn load_posts_from_database(path: &str) -> Result<Vec<Post>> {
    if !Path::new(path).exists() {
        anyhow::bail!("Database file not found: {}", path);
    }

    let db = Database::new(path).context("Failed to open database connection")?;
    PostRepository::new(db.pool.clone())
        .list_all()
        .context("Failed to read posts")
}

fn load_posts(source: &Source) -> Result<Vec<Post>> {
    match &source.input {
        Some(path) => load_posts_from_file(path),
        None => load_posts_from_database(&source.database),
    }
}

/// Build the feed the server would return for this tag
fn build_feed(posts: &[Post], target: &TargetTag, ranker: &PostRanker) -> HashtagFeedResponse {
    let ranked = ranker.rank_target(posts, target);
    HashtagFeedResponse {
        tag: ranked.tag.clone(),
        similar_tags: ranked.sorted_similar_tags(),
        count: ranked.count(),
        posts: ranked
            .items
            .iter()
            .map(|item| RankedPost {
                post: item.post.clone(),
                match_kind: item.match_kind,
            })
            .collect(),
    }
}

fn display_feed(feed: &HashtagFeedResponse) {
    println!("#{} ({} posts)", feed.tag, feed.count);
    println!("Matching tags: {}", feed.similar_tags.join(", "));
    println!();

    if feed.posts.is_empty() {
        println!("No posts found for #{}", feed.tag);
        return;
    }

    for (i, ranked) in feed.posts.iter().enumerate() {
        println!(
            "{:>3}. [{:<7}] {:>5} likes  @{}: {}",
            i + 1,
            ranked.match_kind.as_str(),
            ranked.post.like_count,
            ranked.post.author_name,
            ranked.post.caption
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Rank {
            tag,
            source,
            matching,
            json,
        } => {
            let target = TargetTag::parse(&tag)?;
            let posts = load_posts(&source)?;
            let feed = build_feed(&posts, &target, &matching.ranker()?);

            if json {
                println!("{}", serde_json::to_string_pretty(&feed)?);
            } else {
                display_feed(&feed);
            }
        }
        Command::Similar {
            tag,
            source,
            matching,
        } => {
            let target = TargetTag::parse(&tag)?;
            let posts = load_posts(&source)?;
            let mut tags: Vec<String> = matching
                .ranker()?
                .similar_tags(&posts, target.normalized())
                .into_iter()
                .collect();
            tags.sort();

            for tag in tags {
                println!("#{}", tag);
            }
        }
        Command::Tags { source } => {
            let posts = load_posts(&source)?;
            println!("Found {} posts", posts.len());
            for summary in summarize_hashtags(&posts) {
                println!("{:>5}  #{}", summary.post_count, summary.name);
            }
        }
    }

    Ok(())
}
