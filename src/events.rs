//! Host notifications (spec §6): three one-shot, payload-free signals that
//! a host scene-graph adapter may listen for. The core never reads them
//! back; it only fires them through whatever `Sink` the host installs.

/// One of the three notifications the core may emit while adapting to a
/// host scene graph. Carries no payload beyond its own identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryEvent {
    /// A geometry's base mesh was reassigned.
    GeometryReassigned,
    /// A derived geometry's `update()` completed and republished its mesh
    /// and maps.
    DerivedGeometryUpdated,
    /// The host-facing triangle-list buffers were rewritten via
    /// [`crate::io::to_triangle_list`].
    HostBuffersRewritten,
}

/// A fire-and-forget event receiver. The core depends on no particular
/// implementation; a host wires up its own (scene-graph dirty flags,
/// logging, a channel) by implementing this trait.
pub trait Sink {
    fn notify(&mut self, event: GeometryEvent);
}

/// A `Sink` that drops every event; the default when a host doesn't care.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn notify(&mut self, _event: GeometryEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<GeometryEvent>);

    impl Sink for Recorder {
        fn notify(&mut self, event: GeometryEvent) {
            self.0.push(event);
        }
    }

    #[test]
    fn records_events_in_order() {
        let mut sink = Recorder::default();
        sink.notify(GeometryEvent::GeometryReassigned);
        sink.notify(GeometryEvent::DerivedGeometryUpdated);
        assert_eq!(
            sink.0,
            vec![
                GeometryEvent::GeometryReassigned,
                GeometryEvent::DerivedGeometryUpdated,
            ]
        );
    }

    #[test]
    fn null_sink_drops_everything() {
        let mut sink = NullSink;
        sink.notify(GeometryEvent::HostBuffersRewritten);
    }
}
