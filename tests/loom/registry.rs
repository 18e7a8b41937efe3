use loom::sync::Arc;
use loom::thread;
use tether::core::Exit;
use tether::core::Pid;
use tether::erts::LinkConfig;
use tether::erts::Signal;
use tether::erts::SignalExit;
use tether::erts::SignalUnlinkAck;
use tether::link::LinkRegistry;

fn pid(name: &str, number: u32) -> Pid {
  Pid::new(name, number, 0, 1).unwrap()
}

fn registry() -> LinkRegistry {
  LinkRegistry::with_config(LinkConfig {
    prune_empty_tables: true,
    ..LinkConfig::new()
  })
}

#[test]
fn link_races_stray_signal() {
  loom::model(|| {
    let registry: Arc<LinkRegistry> = Arc::new(registry());
    let a: Pid = pid("a@host", 1);
    let b: Pid = pid("b@host", 2);
    let c: Pid = pid("c@host", 3);

    let t1 = {
      let registry: Arc<LinkRegistry> = Arc::clone(&registry);
      let (a, b) = (a.clone(), b.clone());

      thread::spawn(move || {
        registry.link(&a, &b).unwrap();
      })
    };

    let t2 = {
      let registry: Arc<LinkRegistry> = Arc::clone(&registry);
      let stray: Signal = SignalExit::new(c, a.clone(), Exit::Killed).into();

      thread::spawn(move || registry.on_peer_signal(stray))
    };

    t1.join().unwrap();
    assert!(t2.join().unwrap().is_none());

    let table = registry.table(&a).expect("link table pruned while populated");
    assert!(table.find_link(&a, &b).is_some());
  });
}

#[test]
fn link_races_emptying_ack() {
  loom::model(|| {
    let registry: Arc<LinkRegistry> = Arc::new(registry());
    let a: Pid = pid("a@host", 1);
    let b: Pid = pid("b@host", 2);
    let c: Pid = pid("c@host", 3);

    registry.link(&a, &b).unwrap();

    let Some(Signal::Unlink(unlink)) = registry.unlink(&a, &b) else {
      panic!("expected unlink signal");
    };

    let ack: Signal = SignalUnlinkAck::new(b.clone(), a.clone(), unlink.ulid()).into();

    let t1 = {
      let registry: Arc<LinkRegistry> = Arc::clone(&registry);
      let (a, c) = (a.clone(), c.clone());

      thread::spawn(move || {
        registry.link(&a, &c).unwrap();
      })
    };

    let t2 = {
      let registry: Arc<LinkRegistry> = Arc::clone(&registry);
      thread::spawn(move || registry.on_peer_signal(ack))
    };

    t1.join().unwrap();
    assert!(t2.join().unwrap().is_none());

    // The ack emptied the table, but the new link must survive the prune.
    let table = registry.table(&a).expect("link table pruned while populated");

    assert_eq!(table.len(), 1);
    assert!(table.find_link(&a, &c).is_some());
  });
}
