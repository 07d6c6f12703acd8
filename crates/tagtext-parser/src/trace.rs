//! Parse diagnostics.

/// Receives one line per parse step.
///
/// Lines go to the optional caller sink and to `log::trace!`; they are only
/// formatted when one of the two will see them.
pub struct Trace<'s> {
    sink: Option<&'s mut dyn FnMut(&str)>,
}

impl<'s> Trace<'s> {
    pub fn new(sink: &'s mut dyn FnMut(&str)) -> Self {
        Self { sink: Some(sink) }
    }

    /// A trace that only reaches the logger.
    pub fn silent() -> Self {
        Self { sink: None }
    }

    pub fn line(&mut self, line: impl FnOnce() -> String) {
        if self.sink.is_none() && !log::log_enabled!(log::Level::Trace) {
            return;
        }
        let line = line();
        log::trace!("{line}");
        if let Some(sink) = self.sink.as_mut() {
            sink(&line);
        }
    }
}
