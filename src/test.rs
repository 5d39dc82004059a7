#![cfg(test)]

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    backend::Device,
    store::{KvStore, StoreConfig, StoreHandle},
    tensor::Tensor,
    updater::{Sgd, Updater},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct AddUpdater;

impl Updater for AddUpdater {
    fn merge(&self, contribution: &[f32], accum: &mut [f32]) {
        accum.iter_mut().zip(contribution).for_each(|(a, c)| *a += c);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sgd_convergence() {
    init_logging();

    const MAX_EPOCHS: usize = 100;
    const NPARAMS: usize = 2;
    const TARGET: [f32; NPARAMS] = [1., 2.];

    let store = KvStore::new(StoreConfig::new().updater(Sgd::new(0.3)));
    store.init_devices(&[Device(0)]).unwrap();
    store.init(0, &Tensor::from_slice(&[0.5, -1.])).unwrap();

    let handle = StoreHandle::new(store);
    let params = Tensor::zeros(NPARAMS);

    for _ in 0..MAX_EPOCHS {
        handle.pull(0, &params).await.unwrap();

        let grad: Vec<f32> = params
            .to_vec()
            .iter()
            .zip(TARGET)
            .map(|(p, t)| p - t)
            .collect();
        handle.push(0, &Tensor::from_slice(&grad)).await.unwrap();
    }

    handle.pull(0, &params).await.unwrap();
    for (p, t) in params.to_vec().iter().zip(TARGET) {
        assert!((p - t).abs() < 1e-3, "parameter {p} didn't reach {t}");
    }
}

#[test]
fn test_many_workers_accumulate_everything() {
    init_logging();

    const WORKERS: usize = 8;
    const PUSHES: usize = 25;

    let store = KvStore::new(StoreConfig::new().updater(AddUpdater));
    store.init_devices(&[Device(0)]).unwrap();
    store.init(0, &Tensor::zeros(1)).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..WORKERS {
            let store = &store;
            scope.spawn(move || {
                for _ in 0..PUSHES {
                    store.push(0, &Tensor::from_slice(&[1.])).unwrap().wait();
                }
            });
        }
    });

    let out = Tensor::zeros(1);
    store.pull(0, &out).unwrap().wait();
    assert_eq!(out.to_vec(), [(WORKERS * PUSHES) as f32]);
}

#[test]
fn test_workers_read_their_own_writes() {
    init_logging();

    const WORKERS: usize = 4;

    // each worker owns a key; its pull must always observe its latest push
    let store = KvStore::new(StoreConfig::new());
    store.init_devices(&[Device(0)]).unwrap();
    for key in 0..WORKERS as i32 {
        store.init(key, &Tensor::zeros(1)).unwrap();
    }

    let violations = AtomicUsize::new(0);
    std::thread::scope(|scope| {
        for key in 0..WORKERS as i32 {
            let store = &store;
            let violations = &violations;
            scope.spawn(move || {
                let out = Tensor::zeros(1);
                for round in 1..=50 {
                    store.push(key, &Tensor::from_slice(&[round as f32])).unwrap();
                    store.pull(key, &out).unwrap().wait();
                    if out.to_vec() != [round as f32] {
                        violations.fetch_add(1, Ordering::AcqRel);
                    }
                }
            });
        }
    });

    assert_eq!(violations.load(Ordering::Acquire), 0);
}

#[test]
fn test_stop_and_rebuild_round_trip() {
    init_logging();

    let store = KvStore::new(StoreConfig::new().updater(AddUpdater));
    store.init_devices(&[Device(0)]).unwrap();
    store.init(0, &Tensor::from_slice(&[10.])).unwrap();
    store.push(0, &Tensor::from_slice(&[5.])).unwrap().wait();
    store.stop();

    store.init_devices(&[Device(0)]).unwrap();
    store.init(0, &Tensor::from_slice(&[1.])).unwrap();

    let out = Tensor::zeros(1);
    store.pull(0, &out).unwrap().wait();
    assert_eq!(out.to_vec(), [1.]);
}
