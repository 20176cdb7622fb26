mod io;
mod types;
