use loom::sync::Arc;
use loom::thread;
use tether::core::Exit;
use tether::core::Pid;
use tether::erts::Reaction;
use tether::erts::Signal;
use tether::erts::SignalExit;
use tether::link::LinkTable;

fn pid(name: &str, number: u32) -> Pid {
  Pid::new(name, number, 0, 1).unwrap()
}

#[test]
fn symmetric_inserts_dedup() {
  loom::model(|| {
    let a: Pid = pid("a@host", 1);
    let b: Pid = pid("b@host", 2);
    let table: Arc<LinkTable> = Arc::new(LinkTable::new(a.clone()));

    let t1 = {
      let table: Arc<LinkTable> = Arc::clone(&table);
      let (a, b) = (a.clone(), b.clone());

      thread::spawn(move || {
        table.insert_link(&a, &b).unwrap();
      })
    };

    let t2 = {
      let table: Arc<LinkTable> = Arc::clone(&table);
      let (a, b) = (a.clone(), b.clone());

      thread::spawn(move || {
        table.insert_link(&b, &a).unwrap();
      })
    };

    t1.join().unwrap();
    t2.join().unwrap();

    assert_eq!(table.len(), 1, "symmetric inserts created two links");
  });
}

#[test]
fn ack_races_exit() {
  loom::model(|| {
    let a: LinkTable = LinkTable::new(pid("a@host", 1));
    let b: LinkTable = LinkTable::new(pid("b@host", 2));

    let link: Signal = a.link(b.owner()).unwrap().unwrap();
    let _ = b.on_peer_signal(link);

    let unlink: Signal = a.unlink(b.owner()).unwrap();
    let ack: Signal = b.on_peer_signal(unlink).into_parts().0.unwrap();

    // B has unlinked, so its exit fans out to nobody.
    assert!(b.exit(&Exit::Killed).is_empty());

    let a: Arc<LinkTable> = Arc::new(a);
    let exit: Signal = SignalExit::new(b.owner().clone(), a.owner().clone(), Exit::Killed).into();

    let t1 = {
      let a: Arc<LinkTable> = Arc::clone(&a);
      thread::spawn(move || a.on_peer_signal(ack))
    };

    let t2 = {
      let a: Arc<LinkTable> = Arc::clone(&a);
      thread::spawn(move || a.on_peer_signal(exit))
    };

    let r1: Reaction = t1.join().unwrap();
    let r2: Reaction = t2.join().unwrap();

    assert!(r1.is_none());
    assert!(r2.is_none(), "exit leaked through a pending unlink");
    assert!(a.is_empty());
  });
}

#[test]
fn unlink_races_local_exit() {
  loom::model(|| {
    let a: Arc<LinkTable> = Arc::new(LinkTable::new(pid("a@host", 1)));
    let b: Pid = pid("b@host", 2);

    a.link(&b).unwrap();

    let t1 = {
      let a: Arc<LinkTable> = Arc::clone(&a);
      let b: Pid = b.clone();
      thread::spawn(move || a.unlink(&b))
    };

    let t2 = {
      let a: Arc<LinkTable> = Arc::clone(&a);
      thread::spawn(move || a.exit(&Exit::Killed))
    };

    let unlink: Option<Signal> = t1.join().unwrap();
    let exits: Vec<Signal> = t2.join().unwrap();

    // Exactly one of the two wins the link.
    assert_ne!(unlink.is_some(), exits.len() == 1);
    assert!(a.is_empty());
  });
}
