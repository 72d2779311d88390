use std::fmt::Arguments;

use super::code::{Block, CodeFile, Const, Enum, Expression, Function, Item, Statement};

/// Output buffer which indents every line by the current nesting depth.
pub struct Printer {
    buf: String,
    depth: usize,
    line_start: bool,
}

impl Printer {
    pub fn new() -> Printer {
        Self {
            buf: String::new(),
            depth: 0,
            line_start: true,
        }
    }

    pub fn write_str(&mut self, str: &str) {
        for (i, line) in str.split('\n').enumerate() {
            if i != 0 {
                self.buf.push('\n');
                self.line_start = true;
            }
            if line.is_empty() {
                continue;
            }
            if self.line_start {
                for _ in 0..self.depth {
                    self.buf.push_str("    ");
                }
                self.line_start = false;
            }
            self.buf.push_str(line);
        }
    }

    /// Makes `write!` usable on the printer without a `Result` to handle.
    pub fn write_fmt(&mut self, args: Arguments<'_>) {
        match args.as_str() {
            Some(str) => self.write_str(str),
            None => self.write_str(&args.to_string()),
        }
    }

    pub fn open(&mut self) {
        self.write_str("{\n");
        self.depth += 1;
    }

    pub fn close(&mut self) {
        self.depth -= 1;
        self.write_str("}");
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

pub fn render(file: &CodeFile) -> String {
    let mut p = Printer::new();

    p.write_str("// This file is generated\n\n");
    if let Some(namespace) = &file.namespace {
        write!(p, "pub mod {namespace} ");
        p.open();
    }

    for (i, item) in file.items.iter().enumerate() {
        if i != 0 {
            p.write_str("\n");
        }
        render_item(item, file, &mut p);
    }

    if file.namespace.is_some() {
        p.close();
        p.write_str("\n");
    }

    p.finish()
}

fn render_item(item: &Item, file: &CodeFile, p: &mut Printer) {
    match item {
        Item::Enum(e) => render_enum(e, p),
        Item::Const(c) => render_const(c, file, p),
        Item::Function(handle) => {
            // foreign functions only exist to be called
            if let Some(body) = &file.functions[*handle].body {
                render_function(&file.functions[*handle], body, file, p);
            }
        }
        Item::Raw(raw) => p.write_str(raw),
    }
}

fn render_enum(e: &Enum, p: &mut Printer) {
    p.write_str("#[allow(non_camel_case_types)]\n");
    p.write_str("#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]\n");
    write!(p, "pub enum {} ", e.name);
    p.open();
    for variant in &e.variants {
        write!(p, "{variant},\n");
    }
    p.close();
    p.write_str("\n");
}

fn render_const(c: &Const, file: &CodeFile, p: &mut Printer) {
    write!(p, "pub const {}: {} = ", c.name, c.ty);
    render_expression(&c.value, file, p);
    p.write_str(";\n");
}

fn render_function(function: &Function, body: &Block, file: &CodeFile, p: &mut Printer) {
    if let Some(comment) = &function.comment {
        for line in comment.lines() {
            write!(p, "// {line}\n");
        }
    }
    p.write_str("#[must_use]\n#[allow(non_snake_case)]\n");
    write!(p, "pub fn {}(s: &mut &str) -> Option<Parsed> ", function.name);
    render_block(body, file, p);
    p.write_str("\n");
}

fn render_block(block: &Block, file: &CodeFile, p: &mut Printer) {
    p.open();
    for statement in &block.statements {
        render_statement(statement, file, p);
    }
    if let Some(tail) = &block.tail {
        render_expression(tail, file, p);
        p.write_str("\n");
    }
    p.close();
}

fn render_statement(statement: &Statement, file: &CodeFile, p: &mut Printer) {
    match statement {
        Statement::Let {
            mutable,
            name,
            value,
        } => {
            let mutable = if *mutable { "mut " } else { "" };
            write!(p, "let {mutable}{name} = ");
            render_expression(value, file, p);
            p.write_str(";\n");
        }
        Statement::Assign { place, value } => {
            render_expression(place, file, p);
            p.write_str(" = ");
            render_expression(value, file, p);
            p.write_str(";\n");
        }
        Statement::Expression(expression) => {
            render_expression(expression, file, p);
            p.write_str(";\n");
        }
        Statement::If { condition, body } => {
            p.write_str("if ");
            render_expression(condition, file, p);
            p.write_str(" ");
            render_block(body, file, p);
            p.write_str("\n");
        }
        Statement::IfLet {
            pattern,
            value,
            body,
        } => {
            write!(p, "if let {pattern} = ");
            render_expression(value, file, p);
            p.write_str(" ");
            render_block(body, file, p);
            p.write_str("\n");
        }
        Statement::WhileLet {
            pattern,
            value,
            body,
        } => {
            write!(p, "while let {pattern} = ");
            render_expression(value, file, p);
            p.write_str(" ");
            render_block(body, file, p);
            p.write_str("\n");
        }
        Statement::Break => p.write_str("break;\n"),
        Statement::Return(value) => {
            p.write_str("return ");
            render_expression(value, file, p);
            p.write_str(";\n");
        }
        Statement::Block(block) => {
            render_block(block, file, p);
            p.write_str("\n");
        }
    }
}

fn render_list(expressions: &[Expression], file: &CodeFile, p: &mut Printer) {
    for (i, expression) in expressions.iter().enumerate() {
        if i != 0 {
            p.write_str(", ");
        }
        render_expression(expression, file, p);
    }
}

fn render_expression(expression: &Expression, file: &CodeFile, p: &mut Printer) {
    match expression {
        Expression::Str(str) => write!(p, "\"{}\"", str.escape_debug()),
        Expression::Path(path) => p.write_str(path),
        Expression::Function(handle) => p.write_str(handle.name(file)),
        Expression::Call {
            function,
            arguments,
        } => {
            write!(p, "{}(", function.name(file));
            render_list(arguments, file, p);
            p.write_str(")");
        }
        Expression::CallPath { path, arguments } => {
            write!(p, "{path}(");
            render_list(arguments, file, p);
            p.write_str(")");
        }
        Expression::MethodCall {
            receiver,
            method,
            arguments,
        } => {
            render_expression(receiver, file, p);
            write!(p, ".{method}(");
            render_list(arguments, file, p);
            p.write_str(")");
        }
        Expression::Reference { mutable, value } => {
            p.write_str(if *mutable { "&mut " } else { "&" });
            render_expression(value, file, p);
        }
        Expression::Deref(value) => {
            p.write_str("*");
            render_expression(value, file, p);
        }
        Expression::Binary {
            left,
            operator,
            right,
        } => {
            render_expression(left, file, p);
            write!(p, " {operator} ");
            render_expression(right, file, p);
        }
        Expression::Array(elements) => {
            if elements.is_empty() {
                p.write_str("&[]");
                return;
            }
            p.write_str("&[\n");
            p.depth += 1;
            for element in elements {
                render_expression(element, file, p);
                p.write_str(",\n");
            }
            p.depth -= 1;
            p.write_str("]");
        }
        Expression::Tuple(elements) => {
            p.write_str("(");
            render_list(elements, file, p);
            p.write_str(")");
        }
    }
}
