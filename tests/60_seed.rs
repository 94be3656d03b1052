mod common;

use anyhow::Result;
use sqlx::PgPool;

use consulting_api::database::DatabaseError;
use consulting_api::services::{
    CaseStudyService, CatalogService, RequirementService, SeedError, SeedFixture, SeedReport, Seeder,
    SiteContentService,
};

#[derive(Debug, PartialEq)]
struct TableCounts {
    requirements: i64,
    case_studies: i64,
    services: i64,
    testimonials: i64,
    site_content: usize,
}

async fn table_counts(pool: &PgPool) -> Result<TableCounts> {
    let catalog = CatalogService::new(pool.clone());
    Ok(TableCounts {
        requirements: RequirementService::new(pool.clone()).count().await?,
        case_studies: CaseStudyService::new(pool.clone()).count().await?,
        services: catalog.count_services().await?,
        testimonials: catalog.count_testimonials().await?,
        site_content: SiteContentService::new(pool.clone()).existing_keys().await?.len(),
    })
}

#[tokio::test]
async fn builtin_seed_never_duplicates_rows() -> Result<()> {
    let upload_dir = tempfile::tempdir()?;
    let Some((pool, config)) = common::connect_database(upload_dir.path()).await? else {
        return Ok(());
    };
    let fixture = SeedFixture::builtin()?;
    let seeder = Seeder::new(pool.clone(), config.security.bcrypt_cost);

    // The admin may already exist from another test binary
    match seeder.run(&config.admin, &fixture).await {
        Ok(_) | Err(SeedError::Database(DatabaseError::Conflict(_))) => {}
        Err(e) => return Err(e.into()),
    }

    let before = table_counts(&pool).await?;
    assert!(before.case_studies > 0);
    assert!(before.services > 0);
    assert!(before.testimonials > 0);
    let keys = SiteContentService::new(pool.clone()).existing_keys().await?;
    for entry in &fixture.site_content {
        let key = entry["key"].as_str().unwrap_or_default();
        assert!(keys.contains(key), "site content '{}' was not seeded", key);
    }

    let second = seeder.run(&config.admin, &fixture).await?;
    assert_eq!(second, SeedReport::default());
    assert_eq!(table_counts(&pool).await?, before);
    Ok(())
}
