// Persistence module for the SQLite auction house store
//
// Every operation is a single short transaction against one connection.
// Uses WAL mode so reporting reads do not block listing writes.

mod store;

pub use store::AuctionStore;
