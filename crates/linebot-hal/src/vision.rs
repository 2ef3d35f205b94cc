//! `VisionChannel` trait for the camera subsystem that reports the line
//! position.

/// Frame producer that locates the line under the robot.
///
/// The capture handshake is split into separate calls so the caller decides
/// how to wait: [`request_capture`][Self::request_capture] starts an
/// asynchronous capture, [`is_ready`][Self::is_ready] is polled until it
/// returns `true`, then [`convert`][Self::convert] turns the raw buffer into a
/// queryable image and [`estimate_line_column`][Self::estimate_line_column]
/// reads the centroid.
pub trait VisionChannel: Send {
    /// Stable identifier for this channel, e.g. `"ov7670"`.
    fn id(&self) -> &str;

    /// Frame width in pixels.  Valid centroids lie in `[0, frame_width)`.
    fn frame_width(&self) -> u32;

    /// Frame height in pixels.
    fn frame_height(&self) -> u32;

    /// Trigger a capture.  Returns immediately.
    fn request_capture(&mut self);

    /// `true` once the requested frame is available.
    fn is_ready(&mut self) -> bool;

    /// Convert the captured raw buffer into a queryable image.
    fn convert(&mut self);

    /// Pixel column of the line centroid at scan row `row`.
    ///
    /// There is no failure signal: when no line is found the channel may
    /// return any value, including one outside the frame.
    fn estimate_line_column(&mut self, row: u32) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Channel that is ready on the first poll and always sees the line at a
    /// fixed column.
    struct FixedColumn {
        ready: bool,
        column: i32,
    }

    impl VisionChannel for FixedColumn {
        fn id(&self) -> &str {
            "fixed"
        }
        fn frame_width(&self) -> u32 {
            80
        }
        fn frame_height(&self) -> u32 {
            60
        }
        fn request_capture(&mut self) {
            self.ready = false;
        }
        fn is_ready(&mut self) -> bool {
            self.ready = true;
            self.ready
        }
        fn convert(&mut self) {}
        fn estimate_line_column(&mut self, _row: u32) -> i32 {
            self.column
        }
    }

    #[test]
    fn handshake_through_trait_object() {
        let mut channel: Box<dyn VisionChannel> = Box::new(FixedColumn {
            ready: false,
            column: 33,
        });
        assert_eq!(channel.id(), "fixed");
        channel.request_capture();
        assert!(channel.is_ready());
        channel.convert();
        let row = channel.frame_height() / 2;
        assert_eq!(channel.estimate_line_column(row), 33);
    }
}
