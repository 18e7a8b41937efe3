use loom::sync::Arc;
use loom::thread;
use std::num::NonZeroU64;
use tether::link::UlidCounter;

#[test]
fn concurrent_ids_unique() {
  loom::model(|| {
    let counter: Arc<UlidCounter> = Arc::new(UlidCounter::new());

    let threads: Vec<_> = (0..2)
      .map(|_| {
        let counter: Arc<UlidCounter> = Arc::clone(&counter);

        thread::spawn(move || {
          let first: NonZeroU64 = counter.next();
          let second: NonZeroU64 = counter.next();

          assert!(first < second, "ids of one thread must increase");

          [first, second]
        })
      })
      .collect();

    let mut ids: Vec<NonZeroU64> = threads
      .into_iter()
      .flat_map(|handle| handle.join().unwrap())
      .collect();

    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 4, "duplicate unlink id handed out");
  });
}
