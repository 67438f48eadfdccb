pub mod goto_cmd;
