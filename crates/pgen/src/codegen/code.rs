use cranelift_entity::{entity_impl, PrimaryMap};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FunctionHandle(u32);
entity_impl!(FunctionHandle);

impl FunctionHandle {
    pub fn name(self, file: &CodeFile) -> &str {
        &file.functions[self].name
    }
}

/// A parsing function with the signature `fn(s: &mut &str) -> Option<Parsed>`.
///
/// Functions without a body are defined elsewhere (the runtime block or user code) and are only ever called.
pub struct Function {
    pub name: String,
    pub comment: Option<String>,
    pub body: Option<Block>,
}

pub struct Enum {
    pub name: String,
    pub variants: Vec<String>,
}

pub struct Const {
    pub name: String,
    pub ty: &'static str,
    pub value: Expression,
}

pub enum Item {
    Enum(Enum),
    Const(Const),
    Function(FunctionHandle),
    /// Verbatim source text.
    Raw(&'static str),
}

#[derive(Default)]
pub struct CodeFile {
    pub functions: PrimaryMap<FunctionHandle, Function>,
    pub items: Vec<Item>,
    /// Wraps all items in `pub mod <namespace>`.
    pub namespace: Option<String>,
}

impl CodeFile {
    pub fn new() -> CodeFile {
        Self::default()
    }
    /// Registers a function whose body is supplied later through [`CodeFile::define_function`],
    /// this allows bodies to call any other function regardless of order.
    /// It still needs to be placed with [`Item::Function`] to be rendered.
    pub fn declare_function(
        &mut self,
        name: impl Into<String>,
        comment: Option<String>,
    ) -> FunctionHandle {
        self.functions.push(Function {
            name: name.into(),
            comment,
            body: None,
        })
    }
    pub fn define_function(&mut self, handle: FunctionHandle, body: Block) {
        let function = &mut self.functions[handle];
        assert!(function.body.is_none(), "Function '{}' defined twice", function.name);
        function.body = Some(body);
    }
    pub fn register_foreign_function(&mut self, name: impl Into<String>) -> FunctionHandle {
        self.functions.push(Function {
            name: name.into(),
            comment: None,
            body: None,
        })
    }
    pub fn push_item(&mut self, item: Item) {
        self.items.push(item);
    }
}

#[derive(Clone, Debug)]
pub enum Expression {
    Str(String),
    /// A variable, constant or any other path, emitted as is.
    Path(String),
    Function(FunctionHandle),
    Call {
        function: FunctionHandle,
        arguments: Vec<Expression>,
    },
    /// Call of something outside the code model, like `Some` or `Vec::new`.
    CallPath {
        path: &'static str,
        arguments: Vec<Expression>,
    },
    MethodCall {
        receiver: Box<Expression>,
        method: &'static str,
        arguments: Vec<Expression>,
    },
    Reference {
        mutable: bool,
        value: Box<Expression>,
    },
    Deref(Box<Expression>),
    Binary {
        left: Box<Expression>,
        operator: &'static str,
        right: Box<Expression>,
    },
    Array(Vec<Expression>),
    Tuple(Vec<Expression>),
}

impl Expression {
    pub fn path(path: impl Into<String>) -> Expression {
        Expression::Path(path.into())
    }
    pub fn mut_ref(self) -> Expression {
        Expression::Reference {
            mutable: true,
            value: Box::new(self),
        }
    }
    pub fn deref(self) -> Expression {
        Expression::Deref(Box::new(self))
    }
    pub fn method(self, method: &'static str, arguments: Vec<Expression>) -> Expression {
        Expression::MethodCall {
            receiver: Box::new(self),
            method,
            arguments,
        }
    }
    pub fn binary(self, operator: &'static str, right: Expression) -> Expression {
        Expression::Binary {
            left: Box::new(self),
            operator,
            right: Box::new(right),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Statement {
    Let {
        mutable: bool,
        name: &'static str,
        value: Expression,
    },
    Assign {
        place: Expression,
        value: Expression,
    },
    Expression(Expression),
    If {
        condition: Expression,
        body: Block,
    },
    IfLet {
        pattern: &'static str,
        value: Expression,
        body: Block,
    },
    WhileLet {
        pattern: &'static str,
        value: Expression,
        body: Block,
    },
    Break,
    Return(Expression),
    Block(Block),
}

#[derive(Clone, Default, Debug)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub tail: Option<Expression>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Block {
        Self {
            statements,
            tail: None,
        }
    }
    pub fn with_tail(statements: Vec<Statement>, tail: Expression) -> Block {
        Self {
            statements,
            tail: Some(tail),
        }
    }
}
