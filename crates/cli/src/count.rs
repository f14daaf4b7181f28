//! "One ... Two" demo: N concurrent tasks that each print, sleep, print again

use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::sleep;

pub async fn count(delay: Duration) {
    println!("One");
    sleep(delay).await;
    println!("Two");
}

/// Run `tasks` copies of [`count`] concurrently and wait for all of them
pub async fn run(tasks: usize, delay: Duration) -> anyhow::Result<()> {
    let mut set = JoinSet::new();
    for _ in 0..tasks {
        set.spawn(count(delay));
    }
    while let Some(joined) = set.join_next().await {
        joined?;
    }
    Ok(())
}
