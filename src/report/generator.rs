//! Dashboard rendering.
//!
//! This module renders a [`Dashboard`] as terminal text, a Markdown
//! document or JSON.

use crate::models::{AggregationResult, Dashboard, LanguageCount, Profile, Repository};
use anyhow::Result;
use serde::Serialize;

/// Shown when no repository carries a language label.
pub const NO_LANGUAGES: &str = "No language data available";

/// Shown when the user has no repositories.
pub const NO_REPOSITORIES: &str = "No repositories found";

/// Format a language share with one decimal.
pub fn format_share(stats: &AggregationResult, language: &LanguageCount) -> String {
    format!("{:.1}%", stats.language_share(language))
}

/// One line of the language list: `12 repos (40.0%)`.
fn language_summary(stats: &AggregationResult, language: &LanguageCount) -> String {
    format!(
        "{} repos ({})",
        language.count,
        format_share(stats, language)
    )
}

fn repo_meta(repo: &Repository) -> String {
    format!(
        "⭐ {}  🍴 {}  {}",
        repo.stargazers_count,
        repo.forks_count,
        repo.language_or_plain()
    )
}

/// Generate a plain text dashboard for the terminal.
pub fn generate_text_report(dashboard: &Dashboard) -> String {
    let profile = &dashboard.profile;
    let stats = &dashboard.stats;
    let mut output = String::new();

    output.push_str(&format!("{} (@{})\n", profile.display_name(), profile.login));
    output.push_str(&format!("{}\n", profile.html_url));
    output.push_str(&format!("{}\n\n", profile.bio_or_default()));

    output.push_str(&format!(
        "Public Repos: {}   Total Stars: {}   Followers: {}\n\n",
        profile.public_repos, stats.total_stars, profile.followers
    ));

    output.push_str("Top Languages\n");
    if stats.top_languages.is_empty() {
        output.push_str(&format!("  {}\n", NO_LANGUAGES));
    } else {
        let width = stats
            .top_languages
            .iter()
            .map(|l| l.language.chars().count())
            .max()
            .unwrap_or(0);
        for lang in &stats.top_languages {
            output.push_str(&format!(
                "  {:<width$}  {}\n",
                lang.language,
                language_summary(stats, lang),
                width = width
            ));
        }
    }
    output.push('\n');

    output.push_str("Top Repositories\n");
    if stats.top_repositories.is_empty() {
        output.push_str(&format!("  {}\n", NO_REPOSITORIES));
    } else {
        for repo in &stats.top_repositories {
            output.push_str(&format!("  {}  {}\n", repo.name, repo_meta(repo)));
            output.push_str(&format!("    {}\n", repo.html_url));
        }
    }

    output
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "# GitHub Activity: {}\n\n",
        dashboard.profile.display_name()
    ));

    output.push_str(&generate_profile_section(&dashboard.profile));
    output.push_str(&generate_stats_section(&dashboard.profile, &dashboard.stats));
    output.push_str(&generate_languages_section(&dashboard.stats));
    output.push_str(&generate_repositories_section(&dashboard.stats.top_repositories));

    output.push_str("---\n\n");
    output.push_str(&format!(
        "*Generated by ghstats on {}*\n",
        dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn generate_profile_section(profile: &Profile) -> String {
    let mut section = String::new();

    section.push_str("## Profile\n\n");
    section.push_str(&format!(
        "![{}'s avatar]({})\n\n",
        profile.login, profile.avatar_url
    ));
    section.push_str(&format!(
        "**{}** [@{}]({})\n\n",
        profile.display_name(),
        profile.login,
        profile.html_url
    ));
    section.push_str(&format!("> {}\n\n", profile.bio_or_default()));

    section
}

fn generate_stats_section(profile: &Profile, stats: &AggregationResult) -> String {
    let mut section = String::new();

    section.push_str("## Stats\n\n");
    section.push_str("| Public Repos | Total Stars | Followers |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        profile.public_repos, stats.total_stars, profile.followers
    ));

    section
}

fn generate_languages_section(stats: &AggregationResult) -> String {
    let mut section = String::new();

    section.push_str("## Top Languages\n\n");
    if stats.top_languages.is_empty() {
        section.push_str(&format!("{}\n\n", NO_LANGUAGES));
        return section;
    }

    section.push_str("| Language | Repos | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for lang in &stats.top_languages {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            lang.language,
            lang.count,
            format_share(stats, lang)
        ));
    }
    section.push('\n');

    section
}

fn generate_repositories_section(repos: &[Repository]) -> String {
    let mut section = String::new();

    section.push_str("## Top Repositories\n\n");
    if repos.is_empty() {
        section.push_str(&format!("{}\n\n", NO_REPOSITORIES));
        return section;
    }

    for repo in repos {
        section.push_str(&format!("- [{}]({}) {}\n", repo.name, repo.html_url, repo_meta(repo)));
        if let Some(ref description) = repo.description {
            if !description.is_empty() {
                section.push_str(&format!("  {}\n", description));
            }
        }
    }
    section.push('\n');

    section
}

#[derive(Serialize)]
struct LanguageEntry<'a> {
    language: &'a str,
    count: usize,
    share: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    dashboard: &'a Dashboard,
    language_shares: Vec<LanguageEntry<'a>>,
}

/// Generate a JSON report.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    let stats = &dashboard.stats;
    let report = JsonReport {
        dashboard,
        language_shares: stats
            .top_languages
            .iter()
            .map(|lang| LanguageEntry {
                language: &lang.language,
                count: lang.count,
                share: stats.language_share(lang),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report).map_err(Into::into)
}
