//! Template compilation example
//!
//! Run with: cargo run --example build_query -p sqltpl
//!
//! With `--features mysql` and MYSQL_URL set (environment or .env file), the
//! last query is also dry-run against the server.

use sqltpl::{Arg, TemplateCompiler, TemplateError, args, skip};

/// Optional search filters
struct UserFilter {
    ids: Vec<i64>,
    blocked: Option<bool>,
}

fn search_users(compiler: &TemplateCompiler, filter: &UserFilter) -> Result<String, TemplateError> {
    compiler.build_query(
        "SELECT name FROM users WHERE ?# IN (?a){ AND block = ?d}",
        &args![
            "user_id",
            filter.ids.clone(),
            filter.blocked.map_or_else(skip, Arg::from)
        ],
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let compiler = TemplateCompiler::new();

    println!(
        "{}",
        compiler.build_query(
            "SELECT * FROM users WHERE name = ? AND block = 0",
            &args!["O'Brien"],
        )?
    );

    println!(
        "{}",
        compiler.build_query(
            "UPDATE users SET ?a WHERE user_id = ?d",
            &[
                Arg::map([("name", Arg::from("Jack")), ("email", Arg::Null)]),
                Arg::from(42),
            ],
        )?
    );

    let filter = UserFilter {
        ids: vec![1, 2, 3],
        blocked: None,
    };
    println!("{}", search_users(&compiler, &filter)?);

    let filter = UserFilter {
        blocked: Some(true),
        ..filter
    };
    let sql = search_users(&compiler, &filter)?;
    println!("{sql}");

    match compiler.build_query("SELECT ?# FROM users", &args!["name; DROP TABLE users"]) {
        Ok(sql) => println!("unexpected: {sql}"),
        Err(e) => println!("rejected: {e}"),
    }

    #[cfg(feature = "mysql")]
    {
        let _ = dotenvy::dotenv();
        if let Ok(url) = std::env::var("MYSQL_URL") {
            let pool = mysql_async::Pool::new(url.as_str());
            match sqltpl_check::dry_run(&pool, &sql).await? {
                None => println!("dry run ok"),
                Some(message) => println!("dry run rejected: {message}"),
            }
            pool.disconnect().await?;
        }
    }

    Ok(())
}
