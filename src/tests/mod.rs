mod op;
mod parse;
