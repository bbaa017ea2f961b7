#![allow(unused)]
//! LogSink integration harness.
//!
//! # What this covers
//!
//! - Single-slot delivery: one handler at a time, later subscriptions
//!   replace earlier ones, unclaimed messages go to the fallback.
//! - Disposal: terminal, idempotent, and never an error for callers that
//!   still hold the sink.
//! - Activation through the service container and publishing from feed
//!   threads via the channel.
//!
//! # Running
//!
//! ```sh
//! cargo test --test sink_harness
//! ```

mod common;
use common::*;

use std::sync::{Arc, Mutex};

use logpanel::{Disposable, Extension, LogSink, LogView, Message, Services};
use pretty_assertions::assert_eq;

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&Message) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    (seen, move |m: &Message| sink_seen.lock().unwrap().push(m.content().to_string()))
}

#[test]
fn second_subscriber_replaces_first() {
    let sink = LogSink::new();
    let (first, f) = recorder();
    let (second, g) = recorder();

    let _a = sink.subscribe(f);
    sink.publish(Message::stream("one"));
    let _b = sink.subscribe(g);
    sink.publish(Message::stream("two"));

    assert_eq!(*first.lock().unwrap(), vec!["one"]);
    assert_eq!(*second.lock().unwrap(), vec!["two"]);
}

#[test]
fn unclaimed_messages_reach_the_fallback() {
    let (fallback, f) = recorder();
    let sink = LogSink::with_fallback(f);

    sink.publish(Message::stream("nobody home"));
    {
        let _view = LogView::attach(&sink);
        sink.publish(Message::stream("claimed"));
    }
    sink.publish(Message::stream("view dropped"));

    assert_eq!(*fallback.lock().unwrap(), vec!["nobody home", "view dropped"]);
}

#[test]
fn dispose_twice_equals_dispose_once() {
    let (fallback, f) = recorder();
    let sink = LogSink::with_fallback(f);
    let view = LogView::attach(&sink);

    sink.dispose();
    assert!(sink.is_disposed());
    sink.dispose();
    assert!(sink.is_disposed());

    sink.publish(Message::stream("ignored"));
    let late = sink.subscribe(|_| panic!("must not be called"));
    sink.publish(Message::stream("ignored too"));

    assert!(!late.is_active());
    assert!(view.is_empty());
    assert!(fallback.lock().unwrap().is_empty());
}

#[test]
fn extension_lifecycle_through_services() {
    let mut services = Services::new();
    let sink = Extension::activate(&mut services);

    // A consumer looks the sink up instead of holding a global.
    let consumer = services.require::<LogSink>().unwrap();
    let view = LogView::attach(&consumer);
    sink.publish(MessageBuilder::stream("via services").build());
    assert_contents!(view, ["via services"]);

    Extension::deactivate(&services);
    assert!(consumer.is_disposed());
    sink.publish(Message::stream("after teardown"));
    assert_eq!(view.len(), 1);
}

#[test]
fn feed_threads_publish_through_the_channel() {
    let (sink, view) = wired_view();
    let (tx, mut rx) = logpanel::feeds::channel();

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let tx = tx.clone();
            std::thread::spawn(move || {
                for i in 0..25 {
                    tx.send(Message::stream(format!("p{p}-{i}"))).unwrap();
                }
            })
        })
        .collect();
    drop(tx);
    for producer in producers {
        producer.join().unwrap();
    }

    // Only this thread touches the sink.
    while let Ok(message) = rx.try_recv() {
        sink.publish(message);
    }

    assert_eq!(view.len(), 100);
    assert_numbered_newest_first!(view);
}
