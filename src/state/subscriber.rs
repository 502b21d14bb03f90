use super::StoreState;

/// Listener notified with the new state after every transition that changed
/// something.
///
pub trait Subscriber {
    fn notify(&mut self, state: &StoreState);
}

impl<F> Subscriber for F
where
    F: FnMut(&StoreState),
{
    fn notify(&mut self, state: &StoreState) {
        self(state)
    }
}
