use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
};

use wrapp_context::{Cleanup, Context, Lazy, Product};

fn main() {
    let connections = Arc::new(AtomicUsize::new(0));
    let opened = connections.clone();

    let ctx = Context::builder()
        .add_instance("greeting", String::from("hello"))
        .add_shared("db", move || {
            let id = opened.fetch_add(1, Ordering::SeqCst);
            Product::new(
                Db { id },
                Cleanup::new(move || println!("closing connection {id}")),
            )
        })
        .add_factory("request", || {
            Product::new(Request, Cleanup::new(|| println!("dropping request")))
        })
        .build()
        .unwrap();

    println!("{:?}", ctx);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let db = ctx.require::<Db>("db");
                let _request = ctx.require::<Request>("request");
                println!("worker using connection {}", db.id);
            });
        }
    });

    let greeting: Lazy<String> = ctx.resolve_as("greeting").unwrap();
    println!("{} - {} connection(s) opened", greeting.as_str(), connections.load(Ordering::SeqCst));

    if let Err(errors) = ctx.dispose() {
        eprintln!("{errors}");
    }
}

#[derive(Debug)]
struct Db {
    id: usize,
}

#[derive(Debug)]
struct Request;
