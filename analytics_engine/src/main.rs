use analytics_engine::{
    config::{get_config, Config},
    crawler::{crawl, CrawlConfig},
    frequency, report, selector,
    stats::{regression, significance},
};
use anyhow::{anyhow, Context, Result};
use chirp_models::{EngagementSample, PosCategory, SocialGraph};
use network_gateway::RestClient;
use std::env;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = get_config()?;
    info!("Configuration loaded successfully");

    let client = RestClient::new(&config.api_base_url, &config.api_bearer_token)?
        .with_timeline_limit(config.timeline_limit);

    // Optional smoke test: validate connectivity without running an analysis
    if env::var("SMOKE_TEST")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
    {
        return run_smoke_test(&client).await;
    }

    let mode = env::var("ANALYSIS_MODE").unwrap_or_else(|_| "topic".to_string());
    match mode.as_str() {
        "topic" => run_topic(&client, config).await,
        "user" => run_user(&client, config).await,
        "network" => run_network(&client, config).await,
        "compare" => run_compare(&client, config).await,
        other => Err(anyhow!(
            "unknown ANALYSIS_MODE: {} (expected topic, user, network, or compare)",
            other
        )),
    }
}

fn pos_category() -> Result<PosCategory> {
    env::var("POS_CATEGORY")
        .unwrap_or_else(|_| "noun".to_string())
        .parse()
        .map_err(Into::into)
}

async fn run_topic(client: &RestClient, config: &Config) -> Result<()> {
    let query = env::var("TOPIC_QUERY").context("TOPIC_QUERY is required in topic mode")?;
    let category = pos_category()?;

    let posts = client
        .fetch_posts_for_query(&query, config.search_limit)
        .await?;
    info!(query = %query, posts = posts.len(), "topic search complete");

    if posts.is_empty() {
        println!("{}", report::no_data(&format!("query \"{}\"", query)));
        return Ok(());
    }

    let tokens = selector::select(&posts, category);
    let mut table = frequency::tabulate(tokens);
    println!(
        "{}",
        report::summarize_table(&format!("query \"{}\"", query), &table)
    );
    table.retain_min_count(config.min_frequency);
    print!("{}", report::render_rows(&table));
    Ok(())
}

async fn run_user(client: &RestClient, config: &Config) -> Result<()> {
    let username = env::var("TARGET_USER").context("TARGET_USER is required in user mode")?;
    let profile = client.resolve_user(&username).await?;

    if profile.is_private {
        println!("@{} has a private account!", profile.screen_name);
        return Ok(());
    }

    let posts = client.fetch_posts_for_user(&profile.user_id, true).await?;
    info!(user = %profile.screen_name, posts = posts.len(), "timeline fetched");

    if posts.is_empty() {
        println!("{}", report::no_data(&format!("@{}", profile.screen_name)));
        return Ok(());
    }

    let analysis = env::var("USER_ANALYSIS").unwrap_or_else(|_| "words".to_string());
    match analysis.as_str() {
        "words" => {
            let tokens = selector::select(&posts, pos_category()?);
            let mut table = frequency::tabulate(tokens);
            println!(
                "{}",
                report::summarize_table(&format!("@{}", profile.screen_name), &table)
            );
            table.retain_min_count(config.min_frequency);
            print!("{}", report::render_rows(&table));
        }
        "engagement" => {
            // reshares as a function of favorites across the timeline
            let favorites: Vec<f64> = posts.iter().map(|p| p.favorites as f64).collect();
            let reshares: Vec<f64> = posts.iter().map(|p| p.reshares as f64).collect();
            let result = regression::fit(&favorites, &reshares)?;
            let summary = regression::summarize_residuals(&result.residuals);

            info!(
                user = %profile.screen_name,
                slope = result.slope,
                r_squared = result.r_squared,
                "engagement regression complete"
            );
            println!(
                "Reshares vs favorites for @{}: slope {}, intercept {}, r^2 {}, p-value {}, std error {}",
                profile.screen_name,
                result.slope,
                result.intercept,
                result.r_squared,
                result.p_value,
                result.std_error,
            );
            println!(
                "Residuals: mean {}, avg overestimate {}, avg underestimate {}",
                summary.mean_residual,
                summary
                    .avg_overestimate
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "n/a".to_string()),
                summary
                    .avg_underestimate
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "n/a".to_string()),
            );
        }
        other => return Err(anyhow!("unknown USER_ANALYSIS: {}", other)),
    }
    Ok(())
}

async fn run_network(client: &RestClient, config: &Config) -> Result<()> {
    let username = env::var("TARGET_USER").context("TARGET_USER is required in network mode")?;
    let crawl_config = CrawlConfig {
        max_connections: config.max_connections,
        include_friends: config.include_friends,
    };

    let crawl_report = crawl(client as &dyn SocialGraph, &username, &crawl_config).await?;
    if !crawl_report.skipped.is_empty() {
        warn!(
            skipped = crawl_report.skipped.len(),
            "some connections were skipped during the crawl"
        );
    }

    if crawl_report.posts.is_empty() {
        println!(
            "{}",
            report::no_data(&format!("the network of @{}", crawl_report.root.screen_name))
        );
        return Ok(());
    }

    let tokens = selector::select(&crawl_report.posts, pos_category()?);
    let mut table = frequency::tabulate(tokens);
    println!(
        "{}",
        report::summarize_table(
            &format!("the network of @{}", crawl_report.root.screen_name),
            &table
        )
    );
    table.retain_min_count(config.min_frequency);
    print!("{}", report::render_rows(&table));
    Ok(())
}

async fn run_compare(client: &RestClient, _config: &Config) -> Result<()> {
    let user_a = env::var("COMPARE_USER_A").context("COMPARE_USER_A is required in compare mode")?;
    let user_b = env::var("COMPARE_USER_B").context("COMPARE_USER_B is required in compare mode")?;

    let mut samples = Vec::with_capacity(2);
    for username in [&user_a, &user_b] {
        let profile = client.resolve_user(username).await?;
        let posts = client.fetch_posts_for_user(&profile.user_id, true).await?;
        if posts.is_empty() {
            println!("{}", report::no_data(&format!("@{}", profile.screen_name)));
            return Ok(());
        }
        samples.push(EngagementSample::from_posts(&profile.screen_name, &posts));
    }

    let result = significance::compare(&samples[0], &samples[1]);
    info!(
        favorites_p = result.favorites_p_value,
        reshares_p = result.reshares_p_value,
        "engagement comparison complete"
    );
    println!(
        "{}",
        report::format_summary(&result, &samples[0].user, &samples[1].user)
    );
    // flat row for the persistence collaborator
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

async fn run_smoke_test(client: &RestClient) -> Result<()> {
    let reachable = client.ping().await;
    info!(ok = reachable, "ping: social api");
    if !reachable {
        return Err(anyhow!("Smoke test failed: social API unreachable"));
    }
    info!("Smoke test complete");
    Ok(())
}
