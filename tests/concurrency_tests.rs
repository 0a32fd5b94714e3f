//! Concurrent use of a shared store

use ini_parser::{ConfigStore, Parser};
use std::thread;

#[test]
fn test_parallel_parsers_share_one_store() {
    let store = ConfigStore::new();

    thread::scope(|scope| {
        for worker in 0..8 {
            let parser = Parser::with_store(store.clone());
            scope.spawn(move || {
                let mut input = format!("[worker {}]\n", worker);
                for i in 0..50 {
                    input.push_str(&format!("key {} = {}\n", i, i));
                }
                input.push_str("[shared]\ncount += x\n");
                parser.parse_str(&input).unwrap();
            });
        }
    });

    assert_eq!(store.sections().len(), 9);
    for worker in 0..8 {
        assert_eq!(store.labels(&format!("worker {}", worker)).len(), 50);
    }
    // Each append is atomic, so none of them is lost
    assert_eq!(store.get("shared", "count"), vec!["x"; 8].join(" "));
}

#[test]
fn test_one_parser_used_from_many_threads() {
    let parser = Parser::new();

    thread::scope(|scope| {
        for worker in 0..4 {
            let parser = &parser;
            scope.spawn(move || {
                let input = format!("[section {}]\nlabel = value {}\n", worker, worker);
                parser.parse_str(&input).unwrap();
            });
        }
    });

    for worker in 0..4 {
        assert_eq!(
            parser.store().get(&format!("section {}", worker), "label"),
            format!("value {}", worker)
        );
    }
}

#[test]
fn test_readers_see_consistent_values_during_writes() {
    let store = ConfigStore::new();
    store.set("S", "L", "start");

    thread::scope(|scope| {
        let writer = store.clone();
        scope.spawn(move || {
            for i in 0..200 {
                writer.set("S", "L", &format!("value {}", i));
            }
        });

        let reader = store.clone();
        scope.spawn(move || {
            for _ in 0..200 {
                let value = reader.get("S", "L");
                assert!(value == "start" || value.starts_with("value "));
            }
        });
    });

    assert_eq!(store.get("S", "L"), "value 199");
}
