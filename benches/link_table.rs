use criterion::BenchmarkGroup;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use std::hint::black_box;
use std::sync::Arc;
use std::sync::Barrier;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;
use tether::core::Exit;
use tether::core::Pid;
use tether::link::LinkTable;

const LINKS: &[u32] = &[8, 64, 512];
const THREADS: &[usize] = &[2, 4, 8];

fn pid(number: u32) -> Pid {
  Pid::new("bench@host", number, 0, 1).unwrap()
}

fn peers(count: u32) -> Vec<Pid> {
  (1..=count).map(pid).collect()
}

fn bench_insert(criterion: &mut Criterion) {
  let mut group: BenchmarkGroup<_> = criterion.benchmark_group("link_insert");

  for links in LINKS {
    let id: BenchmarkId = BenchmarkId::new("single-threaded", links);
    let peers: Vec<Pid> = peers(*links);

    group.bench_with_input(id, &peers, |bench, peers| {
      bench.iter(|| {
        let table: LinkTable = LinkTable::new(pid(0));

        for peer in peers {
          black_box(table.link(peer).unwrap());
        }

        table
      })
    });
  }

  group.finish();
}

fn bench_lookup(criterion: &mut Criterion) {
  let mut group: BenchmarkGroup<_> = criterion.benchmark_group("link_lookup");

  for threads in THREADS {
    let id: BenchmarkId = BenchmarkId::new("multi-threaded", threads);

    group.bench_with_input(id, threads, |bench, &threads| {
      let owner: Pid = pid(0);
      let peers: Arc<Vec<Pid>> = Arc::new(peers(64));
      let table: Arc<LinkTable> = Arc::new(LinkTable::new(owner.clone()));

      for peer in peers.iter() {
        table.link(peer).unwrap();
      }

      bench.iter_custom(|iters| {
        let barrier: Arc<Barrier> = Arc::new(Barrier::new(threads + 1));
        let mut handles: Vec<JoinHandle<Duration>> = Vec::with_capacity(threads);

        for _ in 0..threads {
          let barrier: Arc<Barrier> = barrier.clone();
          let owner: Pid = owner.clone();
          let peers: Arc<Vec<Pid>> = peers.clone();
          let table: Arc<LinkTable> = table.clone();

          let handle: JoinHandle<Duration> = thread::spawn(move || {
            barrier.wait();

            let start: Instant = Instant::now();

            for index in 0..iters {
              let peer: &Pid = &peers[index as usize % peers.len()];
              black_box(table.find_link(peer, &owner));
            }

            start.elapsed()
          });

          handles.push(handle);
        }

        barrier.wait();

        handles
          .into_iter()
          .map(|handle| handle.join().unwrap())
          .sum()
      })
    });
  }

  group.finish();
}

fn bench_exit(criterion: &mut Criterion) {
  let mut group: BenchmarkGroup<_> = criterion.benchmark_group("link_exit");

  for links in LINKS {
    let id: BenchmarkId = BenchmarkId::new("fan-out", links);
    let peers: Vec<Pid> = peers(*links);

    group.bench_with_input(id, &peers, |bench, peers| {
      bench.iter_batched(
        || {
          let table: LinkTable = LinkTable::new(pid(0));

          for peer in peers {
            table.link(peer).unwrap();
          }

          table
        },
        |table| black_box(table.exit(&Exit::Killed)),
        criterion::BatchSize::SmallInput,
      )
    });
  }

  group.finish();
}

criterion_group! {
  name = benches;
  config = Criterion::default();
  targets = bench_insert, bench_lookup, bench_exit
}

criterion_main!(benches);
