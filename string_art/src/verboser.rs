use crate::Chord;

pub enum Message<'a> {
    CreatingNail(usize),
    /// `done` chords out of `total` are already wound; `chord` is the last one.
    Computing {
        done: usize,
        total: usize,
        chord: Option<&'a Chord>,
    },
}

pub trait Verboser {
    fn verbose(&mut self, message: Message);
}

pub struct Silent;

impl Verboser for Silent {
    fn verbose(&mut self, _: Message) {}
}
