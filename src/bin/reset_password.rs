// Binaire pour resetear la contraseña d'un usuario
// Usage: cargo run --bin reset-password -- correo@ejemplo.com nuevaContraseña

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::env;

use helpdesk_backend::db;
use helpdesk_backend::models::usuarios::{ActiveModel as UsuarioActiveModel, Column as UsuarioColumn, Entity as Usuarios};
use helpdesk_backend::utils::password;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Uso: reset-password correo@ejemplo.com nuevaContraseña");
        std::process::exit(1);
    }
    let correo = &args[1];
    let nueva_password = &args[2];

    let db = match db::establish_connection().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    // Vérifier que l'usuario existe
    let usuario = match Usuarios::find()
        .filter(UsuarioColumn::Correo.eq(correo))
        .one(&db)
        .await
    {
        Ok(Some(usuario)) => usuario,
        Ok(None) => {
            eprintln!("❌ Usuario no encontrado con el correo: {}", correo);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("✅ Usuario encontrado: {} ({})", usuario.nombre_completo, usuario.correo);

    let password_hash = match password::hash_password(nueva_password) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut active: UsuarioActiveModel = usuario.into();
    active.password_hash = Set(password_hash);

    if let Err(e) = active.update(&db).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    println!("✅ Contraseña actualizada exitosamente");
    println!("\n📝 Ahora puedes hacer login con:");
    println!("   Correo: {}", correo);
}
