//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todolist_core` wiring end to end: config, logging, storage,
//!   repository writes and cursor paging.
//! - Seed demo lists only into in-memory storage; file databases are
//!   paged as they are.
//! - Keep output deterministic for quick local sanity checks.

use std::error::Error;
use todolist_core::{
    init_logging, with_transaction, CoreConfig, RepoError, SqliteTodoListRepository, TodoItemList,
    TodoListRepository, TodoListService,
};

const DEMO_USER: &str = "demo-user";
const DEMO_LISTS: &[&str] = &["groceries", "chores", "reading", "travel", "gifts"];

fn main() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    println!("todolist_core ping={}", todolist_core::ping());
    println!("todolist_core version={}", todolist_core::core_version());

    let mut conn = config.open_db()?;
    if config.is_in_memory() {
        let seeded = with_transaction(&mut conn, |tx| -> Result<usize, RepoError> {
            let repo = SqliteTodoListRepository::try_new(tx)?;
            for name in DEMO_LISTS {
                repo.add(&TodoItemList::new(*name, DEMO_USER))?;
            }
            Ok(DEMO_LISTS.len())
        })?;
        println!("seeded lists={seeded}");
    }

    let service = TodoListService::new(SqliteTodoListRepository::try_new(&conn)?);
    let mut cursor = None;
    let mut page_number = 1;
    loop {
        let page = service.list_page(DEMO_USER, config.page_size, cursor)?;
        let names: Vec<&str> = page.items.iter().map(|list| list.name.as_str()).collect();
        println!("page={page_number} items={names:?} has_next={}", page.has_next_page);
        if page.next_cursor.is_none() {
            break;
        }
        cursor = page.next_cursor;
        page_number += 1;
    }

    Ok(())
}
