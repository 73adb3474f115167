pub mod call_reader;
pub mod ledger_writer;
