//! Read-only command handlers: get, search, category, categories, stats, levels.

use std::process::ExitCode;

use color_eyre::Result;
use serde::Serialize;

use crate::config::Config;
use crate::context::Context;
use crate::error::AppError;
use crate::models::{ComplexityLevel, Entity, EntityKind, Taxonomy};
use crate::services::{
    select_level_with, LevelFallback, LevelSelection, LevelSelector, QueryService, SearchQuery,
};

use super::{print_json, report_lookup_error, App};

/// One line of a listing; bodies are left out.
#[derive(Serialize)]
struct EntrySummary<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    alternate_name: Option<&'a str>,
    kind: EntityKind,
    category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<usize>,
}

impl<'a> EntrySummary<'a> {
    fn new(entity: &'a Entity) -> Self {
        Self {
            id: &entity.id,
            name: &entity.name,
            alternate_name: entity.alternate_name.as_deref(),
            kind: entity.kind,
            category: &entity.category,
            score: None,
        }
    }
}

#[derive(Serialize)]
struct LevelResponse<'a> {
    id: &'a str,
    name: &'a str,
    /// Tier of the level actually served.
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<ComplexityLevel>,
    #[serde(flatten)]
    selection: LevelSelection<'a>,
}

#[derive(Serialize)]
struct TierInfo {
    rank: u8,
    name: &'static str,
    label: &'static str,
    audience: &'static str,
}

impl App {
    /// Print an entry, or a single level of it.
    pub fn run_get(
        &self,
        config: Config,
        id: &str,
        level: Option<&str>,
        fallback: Option<LevelFallback>,
    ) -> Result<ExitCode> {
        let level = match level.map(parse_level).transpose() {
            Ok(level) => level,
            Err(err) => return report_lookup_error(&err, Some(id)),
        };

        let ctx = Context::from_config(config)?;
        let query: QueryService = ctx.resolve();

        let entity = match query.get_by_id(id) {
            Ok(entity) => entity,
            Err(err) if err.is_not_found() => return report_lookup_error(&err, Some(id)),
            Err(err) => return Err(err.into()),
        };

        let Some(rank) = level else {
            print_json(entity)?;
            return Ok(ExitCode::SUCCESS);
        };

        let selected = match fallback {
            Some(policy) => select_level_with(entity, rank, policy),
            None => ctx.resolve::<LevelSelector>().select(entity, rank),
        };
        match selected {
            Ok(selection) => {
                print_json(&LevelResponse {
                    id: &entity.id,
                    name: &entity.name,
                    tier: selection.level.complexity(),
                    selection,
                })?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) if err.is_not_found() => report_lookup_error(&err, Some(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Print ranked search hits.
    pub fn run_search(
        &self,
        config: Config,
        text: &str,
        limit: Option<usize>,
        category: Option<&str>,
    ) -> Result<ExitCode> {
        let mut search = SearchQuery::new(text);
        if let Some(limit) = config.search.resolve_limit(limit) {
            search = search.limit(limit);
        }
        if let Some(category) = category {
            search = search.category(category);
        }

        let ctx = Context::from_config(config)?;
        let query: QueryService = ctx.resolve();
        if let Some(category) = category {
            warn_if_undeclared(ctx.catalog.taxonomy(), category);
        }
        let hits: Vec<EntrySummary<'_>> = query
            .search_with(&search)
            .into_iter()
            .map(|hit| EntrySummary {
                score: Some(hit.score),
                ..EntrySummary::new(hit.entity)
            })
            .collect();

        tracing::info!(query = %text, hits = hits.len(), "Search complete");
        print_json(&hits)?;
        Ok(ExitCode::SUCCESS)
    }

    /// Print entries in one category. An unknown category is an empty list.
    pub fn run_category(&self, config: Config, slug: &str) -> Result<ExitCode> {
        let ctx = Context::from_config(config)?;
        let query: QueryService = ctx.resolve();

        warn_if_undeclared(ctx.catalog.taxonomy(), slug);
        let entries: Vec<EntrySummary<'_>> = query
            .by_category(slug)
            .into_iter()
            .map(EntrySummary::new)
            .collect();
        print_json(&entries)?;
        Ok(ExitCode::SUCCESS)
    }

    pub fn run_categories(&self, config: Config) -> Result<ExitCode> {
        let ctx = Context::from_config(config)?;
        let query: QueryService = ctx.resolve();
        print_json(&query.categories())?;
        Ok(ExitCode::SUCCESS)
    }

    pub fn run_stats(&self, config: Config) -> Result<ExitCode> {
        let ctx = Context::from_config(config)?;
        let query: QueryService = ctx.resolve();
        print_json(&query.stats())?;
        Ok(ExitCode::SUCCESS)
    }

    /// Print the complexity tiers. Needs no content.
    pub fn run_levels(&self) -> Result<ExitCode> {
        let tiers: Vec<TierInfo> = ComplexityLevel::all()
            .iter()
            .map(|tier| TierInfo {
                rank: tier.rank(),
                name: tier.name(),
                label: tier.label(),
                audience: tier.audience(),
            })
            .collect();
        print_json(&tiers)?;
        Ok(ExitCode::SUCCESS)
    }
}

/// Reads a `--level` argument: any integer is passed through as a rank, so
/// out-of-range numbers still fail as `LevelNotFound`; anything else must
/// be a tier name.
fn parse_level(arg: &str) -> Result<i64, AppError> {
    match arg.trim().parse::<i64>() {
        Ok(rank) => Ok(rank),
        Err(_) => arg
            .parse::<ComplexityLevel>()
            .map(|tier| i64::from(tier.rank())),
    }
}

/// An unknown category yields an empty listing, not an error. Returns
/// whether a warning was logged.
fn warn_if_undeclared(taxonomy: &Taxonomy, slug: &str) -> bool {
    let undeclared = !taxonomy.contains(slug);
    if undeclared {
        tracing::warn!(category = %slug, "Category is not declared in the taxonomy");
    }
    undeclared
}
