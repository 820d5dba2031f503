//! Window size for the PTY

/// Window size in character cells and pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    /// Number of rows (characters)
    pub rows: u16,
    /// Number of columns (characters)
    pub columns: u16,
    /// Width in pixels (0 when undetermined)
    pub xpixels: u16,
    /// Height in pixels (0 when undetermined)
    pub ypixels: u16,
}

impl WindowSize {
    /// Create a new window size
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            rows,
            columns,
            xpixels: 0,
            ypixels: 0,
        }
    }

    /// Create a window size with pixel dimensions
    pub fn with_pixels(columns: u16, rows: u16, xpixels: u16, ypixels: u16) -> Self {
        Self {
            rows,
            columns,
            xpixels,
            ypixels,
        }
    }

    /// Convert to the libc winsize structure
    pub fn to_winsize(&self) -> libc::winsize {
        libc::winsize {
            ws_row: self.rows,
            ws_col: self.columns,
            ws_xpixel: self.xpixels,
            ws_ypixel: self.ypixels,
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl From<libc::winsize> for WindowSize {
    fn from(ws: libc::winsize) -> Self {
        Self {
            rows: ws.ws_row,
            columns: ws.ws_col,
            xpixels: ws.ws_xpixel,
            ypixels: ws.ws_ypixel,
        }
    }
}
