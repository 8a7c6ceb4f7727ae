// storefront/src/services/optimistic.rs

use crate::errors::{AppError, Result};
use std::future::Future;
use storefront_core::ContextData;
use tracing::warn;

/// A locally held list whose edits show up immediately and are undone when
/// the write that persists them fails.
#[derive(Debug, Clone)]
pub struct OptimisticList<T: Clone + Send + Sync + 'static> {
  items: ContextData<Vec<T>>,
}

impl<T: Clone + Send + Sync + 'static> OptimisticList<T> {
  pub fn new(items: Vec<T>) -> Self {
    Self {
      items: ContextData::new(items),
    }
  }

  pub fn snapshot(&self) -> Vec<T> {
    self.items.snapshot()
  }

  pub fn len(&self) -> usize {
    self.items.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.read().is_empty()
  }

  /// Replaces the list wholesale, e.g. after reloading from the store.
  pub fn reset(&self, items: Vec<T>) {
    self.items.update(|current| *current = items);
  }

  /// Applies `edit` locally, then runs `persist` with the edited list.
  /// When `persist` fails the list goes back to what it was before `edit`.
  pub async fn apply<E, P, Fut>(&self, edit: E, persist: P) -> Result<()>
  where
    E: FnOnce(&mut Vec<T>),
    P: FnOnce(Vec<T>) -> Fut,
    Fut: Future<Output = Result<()>>,
  {
    let previous = self.items.update(|items| {
      let previous = items.clone();
      edit(items);
      previous
    });
    let edited = self.items.snapshot();

    match persist(edited).await {
      Ok(()) => Ok(()),
      Err(err) => {
        warn!(error = %err, "Persisting optimistic edit failed, restoring previous list.");
        self.items.update(|items| *items = previous);
        Err(err)
      }
    }
  }
}

/// Moves the element at `from` to `to`, shifting the ones in between.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
  if from >= items.len() || to >= items.len() {
    return Err(AppError::Validation(format!(
      "Cannot move position {} to {} in a list of {}.",
      from,
      to,
      items.len()
    )));
  }
  let item = items.remove(from);
  items.insert(to, item);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn move_item_shifts_neighbours() {
    let mut v = vec!['a', 'b', 'c', 'd'];
    move_item(&mut v, 3, 1).unwrap();
    assert_eq!(v, vec!['a', 'd', 'b', 'c']);
    move_item(&mut v, 0, 3).unwrap();
    assert_eq!(v, vec!['d', 'b', 'c', 'a']);
    assert!(move_item(&mut v, 4, 0).is_err());
  }

  #[tokio::test]
  async fn failed_persist_restores() {
    let list = OptimisticList::new(vec![1, 2, 3]);
    let result = list
      .apply(
        |items| items.reverse(),
        |_| async { Err(AppError::Internal("write failed".into())) },
      )
      .await;
    assert!(result.is_err());
    assert_eq!(list.snapshot(), vec![1, 2, 3]);

    list.apply(|items| items.push(4), |_| async { Ok(()) }).await.unwrap();
    assert_eq!(list.snapshot(), vec![1, 2, 3, 4]);
  }
}
