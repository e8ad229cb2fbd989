//! Schema initializer.
//!
//! Table and column names are part of the produced database file and stay as
//! the workshop material expects them.

/// `CREATE TABLE IF NOT EXISTS` statements, in dependency order.
pub const STATEMENTS: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS clientes (
        id_cliente INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        correo TEXT NOT NULL UNIQUE,
        fecha_nacimiento DATE NOT NULL,
        genero TEXT NOT NULL CHECK(genero IN ('M', 'F', 'Otro'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS productos (
        id_producto INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        categoria TEXT NOT NULL,
        precio REAL NOT NULL CHECK(precio > 0),
        stock INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ventas (
        id_venta INTEGER PRIMARY KEY AUTOINCREMENT,
        id_cliente INTEGER NOT NULL,
        fecha_venta DATE NOT NULL,
        total_venta REAL NOT NULL CHECK(total_venta >= 0),
        cupon_usado TEXT,
        FOREIGN KEY(id_cliente) REFERENCES clientes(id_cliente)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS detalle_ventas (
        id_detalle INTEGER PRIMARY KEY AUTOINCREMENT,
        id_venta INTEGER NOT NULL,
        id_producto INTEGER NOT NULL,
        cantidad INTEGER NOT NULL CHECK(cantidad > 0),
        precio_unitario REAL NOT NULL CHECK(precio_unitario > 0),
        FOREIGN KEY(id_venta) REFERENCES ventas(id_venta),
        FOREIGN KEY(id_producto) REFERENCES productos(id_producto)
    )
    "#,
];

/// Tables created by [`STATEMENTS`].
pub const TABLES: [&str; 4] = ["clientes", "productos", "ventas", "detalle_ventas"];
