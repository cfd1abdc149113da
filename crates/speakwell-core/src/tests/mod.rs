mod desktop;
mod format;
mod recording;
