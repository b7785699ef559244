//! `chatbox migrate`: apply migrations and report what is applied.

use chatbox_types::config::AppConfig;

pub async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = super::open_database(config).await?;
    let applied = pool.applied_migrations().await?;
    pool.close().await;

    for (version, description) in &applied {
        println!("  {version}  {description}");
    }
    println!("{} migration(s) applied", applied.len());
    Ok(())
}
