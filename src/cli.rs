//! Command-line interface.
//!
//! Credentials can come from flags or environment variables; everything
//! else lives in the YAML config file.

use clap::Parser;

use crate::models::SourceName;

/// Command-line arguments for the crawler.
///
/// # Examples
///
/// ```sh
/// # Crawl keywords from the keyword store
/// trend_news_crawler -c config.yaml -o ./out
///
/// # Crawl explicit keywords against two sources
/// trend_news_crawler -c config.yaml -o ./out -k "AI 규제" --sources naver,daum
///
/// # Regenerate and store the keyword sets, then exit
/// trend_news_crawler -c config.yaml --seed-keywords
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Output directory for crawl result JSON files
    #[arg(short, long, default_value = "./out")]
    pub output_dir: String,

    /// Result-page multiplier; each source is asked for count * 10 items
    #[arg(long, default_value_t = 1)]
    pub count: u32,

    /// Crawl these keywords instead of reading the keyword store
    #[arg(short, long)]
    pub keyword: Vec<String>,

    /// Comma-separated sources to crawl (naver, daum, google); all by default
    #[arg(long, value_delimiter = ',')]
    pub sources: Vec<SourceName>,

    /// Keyword store key holding the keyword list
    #[arg(long, default_value = crate::keywords::GENERATED_KEYWORDS_KEY)]
    pub keyword_key: String,

    /// Seed the keyword store from the configured templates, then exit
    #[arg(long)]
    pub seed_keywords: bool,

    /// Skip the courtesy delay before HTML fetches
    #[arg(long)]
    pub no_delay: bool,

    /// Naver API client id
    #[arg(long, env = "NAVER_CLIENT_ID")]
    pub naver_client_id: Option<String>,

    /// Naver API client secret
    #[arg(long, env = "NAVER_CLIENT_SECRET")]
    pub naver_client_secret: Option<String>,

    /// Kakao (Daum) REST API key
    #[arg(long, env = "DAUM_API_KEY")]
    pub daum_api_key: Option<String>,

    /// API key for optional relevance scoring
    #[arg(long, env = "OPENAI_API_KEY")]
    pub scoring_api_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["trend_news_crawler"]);
        assert_eq!(cli.config, "config.yaml");
        assert_eq!(cli.output_dir, "./out");
        assert_eq!(cli.count, 1);
        assert!(cli.keyword.is_empty());
        assert!(cli.sources.is_empty());
        assert_eq!(cli.keyword_key, "KR:default:core_keywords");
        assert!(!cli.seed_keywords);
    }

    #[test]
    fn test_cli_sources_are_comma_separated() {
        let cli = Cli::parse_from(["trend_news_crawler", "--sources", "naver,google"]);
        assert_eq!(cli.sources, vec![SourceName::Naver, SourceName::Google]);
    }

    #[test]
    fn test_cli_rejects_unknown_source() {
        assert!(Cli::try_parse_from(["trend_news_crawler", "--sources", "reuters"]).is_err());
    }

    #[test]
    fn test_cli_repeated_keywords() {
        let cli = Cli::parse_from(["trend_news_crawler", "-k", "AI", "-k", "LLM"]);
        assert_eq!(cli.keyword, vec!["AI", "LLM"]);
    }
}
