//! Sequence-Locked Cell Implementation

use crate::WordPack;
use std::hint;
use std::marker::PhantomData;
use std::sync::atomic::{fence, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

/// Storage shared by the publisher and its readers
struct Shared<const N: usize> {
    /// Odd while a publish is in progress
    seq: AtomicUsize,
    /// Packed record
    words: [AtomicU32; N],
}

/// Create a cell holding `initial` and return its two halves
pub fn channel<T: WordPack<N>, const N: usize>(initial: T) -> (Publisher<T, N>, Reader<T, N>) {
    let shared = Arc::new(Shared {
        seq: AtomicUsize::new(0),
        words: initial.pack().map(AtomicU32::new),
    });
    (
        Publisher {
            shared: Arc::clone(&shared),
            _record: PhantomData,
        },
        Reader {
            shared,
            _record: PhantomData,
        },
    )
}

/// Write half. Not `Clone`: there is exactly one writer per cell.
pub struct Publisher<T, const N: usize> {
    shared: Arc<Shared<N>>,
    _record: PhantomData<fn(T)>,
}

impl<T: WordPack<N>, const N: usize> Publisher<T, N> {
    /// Replace the stored record. Never blocks.
    pub fn publish(&mut self, value: &T) {
        let words = value.pack();
        let seq = self.shared.seq.load(Ordering::Relaxed);

        self.shared.seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        for (slot, word) in self.shared.words.iter().zip(words) {
            slot.store(word, Ordering::Relaxed);
        }

        self.shared.seq.store(seq.wrapping_add(2), Ordering::Release);
    }

    /// Another reader for the same cell
    pub fn reader(&self) -> Reader<T, N> {
        Reader {
            shared: Arc::clone(&self.shared),
            _record: PhantomData,
        }
    }

    /// Number of completed publishes
    pub fn version(&self) -> usize {
        self.shared.seq.load(Ordering::Relaxed) / 2
    }
}

/// Read half. Cheap to clone and safe to share between threads.
pub struct Reader<T, const N: usize> {
    shared: Arc<Shared<N>>,
    _record: PhantomData<fn() -> T>,
}

impl<T, const N: usize> Clone for Reader<T, N> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            _record: PhantomData,
        }
    }
}

impl<T: WordPack<N>, const N: usize> Reader<T, N> {
    /// Read the latest complete record, retrying while a publish is in flight
    pub fn load(&self) -> T {
        loop {
            if let Some(value) = self.try_load() {
                return value;
            }
            hint::spin_loop();
        }
    }

    /// Single read attempt; `None` if it overlapped a publish
    pub fn try_load(&self) -> Option<T> {
        let before = self.shared.seq.load(Ordering::Acquire);
        if before & 1 == 1 {
            return None;
        }

        let mut words = [0u32; N];
        for (word, slot) in words.iter_mut().zip(self.shared.words.iter()) {
            *word = slot.load(Ordering::Relaxed);
        }

        fence(Ordering::Acquire);
        let after = self.shared.seq.load(Ordering::Relaxed);
        (before == after).then(|| T::unpack(words))
    }

    /// Number of completed publishes seen so far
    pub fn version(&self) -> usize {
        self.shared.seq.load(Ordering::Acquire) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::AtomicBool;
    use std::thread;

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Pair {
        a: i16,
        b: i16,
        total: u32,
    }

    impl WordPack<2> for Pair {
        fn pack(&self) -> [u32; 2] {
            [
                (self.a as u16 as u32) << 16 | self.b as u16 as u32,
                self.total,
            ]
        }

        fn unpack(words: [u32; 2]) -> Self {
            Self {
                a: (words[0] >> 16) as u16 as i16,
                b: words[0] as u16 as i16,
                total: words[1],
            }
        }
    }

    #[test]
    fn test_initial_value() {
        let (_publisher, reader) = channel::<Pair, 2>(Pair { a: -3, b: 7, total: 9 });
        assert_eq!(reader.load(), Pair { a: -3, b: 7, total: 9 });
        assert_eq!(reader.version(), 0);
    }

    #[test]
    fn test_publish_and_load() {
        let (mut publisher, reader) = channel::<Pair, 2>(Pair::default());
        publisher.publish(&Pair { a: i16::MIN, b: -1, total: 1 });
        assert_eq!(reader.load(), Pair { a: i16::MIN, b: -1, total: 1 });
        assert_eq!(reader.try_load(), Some(Pair { a: i16::MIN, b: -1, total: 1 }));
        assert_eq!(publisher.version(), 1);
        assert_eq!(reader.version(), 1);
    }

    #[test]
    fn test_readers_share_cell() {
        let (mut publisher, reader) = channel::<[u32; 3], 3>([0u32; 3]);
        let second = publisher.reader();
        let third = reader.clone();
        publisher.publish(&[1, 2, 3]);
        assert_eq!(reader.load(), [1, 2, 3]);
        assert_eq!(second.load(), [1, 2, 3]);
        assert_eq!(third.load(), [1, 2, 3]);
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_record() {
        const WORDS: usize = 10;
        let (mut publisher, reader) = channel::<[u32; WORDS], WORDS>([0u32; WORDS]);
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let reader = reader.clone();
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut last = 0u32;
                    while !done.load(Ordering::Relaxed) {
                        let record = reader.load();
                        assert!(
                            record.iter().all(|w| *w == record[0]),
                            "torn record: {:?}",
                            record
                        );
                        assert!(record[0] >= last, "record went backwards");
                        last = record[0];
                    }
                })
            })
            .collect();

        for i in 1..=200_000u32 {
            publisher.publish(&[i; WORDS]);
        }
        done.store(true, Ordering::Relaxed);

        for handle in readers {
            handle.join().unwrap();
        }
        assert_eq!(reader.load(), [200_000; WORDS]);
    }

    proptest! {
        #[test]
        fn prop_pair_survives_publish(a in any::<i16>(), b in any::<i16>(), total in any::<u32>()) {
            let (mut publisher, reader) = channel::<Pair, 2>(Pair::default());
            let pair = Pair { a, b, total };
            publisher.publish(&pair);
            prop_assert_eq!(reader.load(), pair);
            prop_assert_eq!(reader.try_load(), Some(pair));
        }

        #[test]
        fn prop_last_publish_wins(records in proptest::collection::vec(any::<[u32; 4]>(), 1..32)) {
            let (mut publisher, reader) = channel::<[u32; 4], 4>([0u32; 4]);
            for record in &records {
                publisher.publish(record);
            }
            prop_assert_eq!(reader.load(), records[records.len() - 1]);
            prop_assert_eq!(reader.version(), records.len());
        }
    }
}
