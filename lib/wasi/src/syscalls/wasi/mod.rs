mod args_sizes_get;
mod clock_res_get;
mod clock_time_get;
mod environ_sizes_get;
mod fd_close;
mod fd_datasync;
mod fd_filestat_get;
mod fd_filestat_set_size;
mod fd_read;
mod fd_seek;
mod fd_sync;
mod fd_write;
mod path_open;
mod poll_oneoff_sleep;
mod random_get;

pub use self::{
    args_sizes_get::*, clock_res_get::*, clock_time_get::*, environ_sizes_get::*, fd_close::*,
    fd_datasync::*, fd_filestat_get::*, fd_filestat_set_size::*, fd_read::*, fd_seek::*,
    fd_sync::*, fd_write::*, path_open::*, poll_oneoff_sleep::*, random_get::*,
};
