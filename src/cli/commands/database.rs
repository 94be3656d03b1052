use anyhow::Context;
use serde_json::json;
use sqlx::PgPool;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::services::{SeedFixture, SeedReport, Seeder, SiteContentService};

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    DatabaseManager::connect(&config.database)
        .await
        .context("database is not reachable")
}

pub async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    DatabaseManager::migrate(&pool).await.context("migration failed")?;
    pool.close().await;
    Ok(())
}

/// Shared with `serve`, which seeds on every start.
pub async fn run_seed(pool: &PgPool, config: &AppConfig) -> anyhow::Result<SeedReport> {
    let fixture = SeedFixture::builtin()?;
    let report = Seeder::new(pool.clone(), config.security.bcrypt_cost)
        .run(&config.admin, &fixture)
        .await
        .context("seeding failed")?;
    Ok(report)
}

pub async fn seed(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    DatabaseManager::migrate(&pool).await.context("migration failed")?;
    let report = run_seed(&pool, config).await?;
    pool.close().await;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "admin_created": report.admin,
                "requirements": report.requirements,
                "case_studies": report.case_studies,
                "services": report.services,
                "testimonials": report.testimonials,
                "site_content": report.site_content,
            })
        ),
        OutputFormat::Text => {
            println!("admin created:  {}", report.admin);
            println!("requirements:   {}", report.requirements);
            println!("case studies:   {}", report.case_studies);
            println!("services:       {}", report.services);
            println!("testimonials:   {}", report.testimonials);
            println!("site content:   {}", report.site_content);
        }
    }
    Ok(())
}

pub async fn merge_hero_entries(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let merged = SiteContentService::new(pool.clone()).merge_hero_entries().await?;
    pool.close().await;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "merged": merged })),
        OutputFormat::Text if merged => println!("Merged hero_tagline into hero_description"),
        OutputFormat::Text => println!("Nothing to merge"),
    }
    Ok(())
}
