//! Drive a router over an in-memory history and print what it sees.
//!
//! Run with `RUST_LOG=waypoint_router=debug` to watch the resolver and the stacks.

use std::rc::Rc;

use tracing_subscriber::EnvFilter;
use waypoint_router::prelude::*;

#[derive(Debug)]
enum Page {
    Home,
    Users,
    User,
    UserPosts,
}

fn main() -> Result<(), RouterError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let routes = vec![
        Route::new("/users", Page::Users)
            .child(Route::new("/:id", Page::User).child(Route::new("/posts", Page::UserPosts))),
        Route::new("/", Page::Home),
    ];

    let history = Rc::new(MemoryHistory::with_initial_path("/"));
    let router = HistoryRouter::new(HistoryRouterConfig::new(routes, history.clone()).on_change(
        |previous, current| {
            println!(
                "{} -> {}",
                previous.map_or("-", |m| m.origin_uri()),
                current.map_or("-", |m| m.origin_uri()),
            );
            Ok(())
        },
    ))?;

    router.get_current_matched()?;
    router.navigate_to("/users")?;
    router.navigate_to("/users/7/posts?page=2")?;

    if let Some(current) = router.get_current_matched()? {
        println!(
            "{:?} at {} (id = {:?}, page = {:?})",
            current.route.payload,
            current.full_path(),
            current.match_result.path_param("id"),
            current.match_result.query_param("page"),
        );
    }

    router.go_back()?;
    println!(
        "after going back: {} committed, {} to replay",
        router.get_history_stack().len(),
        router.get_temporarily_stack().len()
    );

    // the user follows a link the router does not handle itself
    history.push("/users/9")?;
    let current = router.get_current_matched()?;
    if let Some(current) = current {
        println!("host moved to {:?}", current.route.payload);
    }

    Ok(())
}
