//! Optimistic reordering of a website list.
//!
//! A move is applied to a speculative copy right away, and the resulting id
//! order is sent to the server. The server's answer either promotes the
//! speculative order (`confirm`) or discards it (`rollback`).

use super::{api::ApiClient, error::ClientError};
use crate::sites::{ListedWebsite, Website};

/// Items that can be placed in a [`SortableList`].
pub trait Sortable: Clone {
    fn sort_id(&self) -> i64;
}

impl Sortable for Website {
    fn sort_id(&self) -> i64 {
        self.id
    }
}

impl Sortable for ListedWebsite {
    fn sort_id(&self) -> i64 {
        self.website.id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Debug)]
pub struct SortableList<T> {
    confirmed: Vec<T>,
    speculative: Vec<T>,
    pending: bool,
}

impl<T: Sortable> SortableList<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            confirmed: items.clone(),
            speculative: items,
            pending: false,
        }
    }

    /// Items as they should be displayed, including unconfirmed moves.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.speculative
    }

    /// Items in the last order the server accepted.
    #[must_use]
    pub fn confirmed(&self) -> &[T] {
        &self.confirmed
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn ids(&self) -> Vec<i64> {
        self.speculative.iter().map(Sortable::sort_id).collect()
    }

    /// Swap `id` with its neighbour and return the id order to submit.
    ///
    /// `None` when `id` is unknown or already at that end of the list; the
    /// list is left unchanged.
    pub fn apply(&mut self, id: i64, direction: Direction) -> Option<Vec<i64>> {
        let index = self.speculative.iter().position(|item| item.sort_id() == id)?;
        let neighbour = match direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => Some(index + 1).filter(|next| *next < self.speculative.len())?,
        };
        self.speculative.swap(index, neighbour);
        self.pending = true;
        Some(self.ids())
    }

    pub fn move_up(&mut self, id: i64) -> Option<Vec<i64>> {
        self.apply(id, Direction::Up)
    }

    pub fn move_down(&mut self, id: i64) -> Option<Vec<i64>> {
        self.apply(id, Direction::Down)
    }

    /// The server accepted the speculative order.
    pub fn confirm(&mut self) {
        self.confirmed.clone_from(&self.speculative);
        self.pending = false;
    }

    /// The server rejected the order; show the last confirmed one again.
    pub fn rollback(&mut self) {
        self.speculative.clone_from(&self.confirmed);
        self.pending = false;
    }

    /// Reconcile with freshly fetched server data.
    pub fn replace(&mut self, items: Vec<T>) {
        self.confirmed.clone_from(&items);
        self.speculative = items;
        self.pending = false;
    }

    /// Apply a move and submit it, confirming or rolling back on the answer.
    ///
    /// # Errors
    /// Returns the submission error after the list has been rolled back.
    pub async fn submit_move(
        &mut self,
        client: &ApiClient,
        id: i64,
        direction: Direction,
    ) -> Result<(), ClientError> {
        let Some(ids) = self.apply(id, direction) else {
            return Ok(());
        };
        match client.reorder_websites(&ids).await {
            Ok(()) => {
                self.confirm();
                Ok(())
            }
            Err(err) => {
                self.rollback();
                Err(err)
            }
        }
    }
}
