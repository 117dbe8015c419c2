// Binaire pour créer l'administrateur par défaut
// Usage: cargo run --bin create-admin

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use helpdesk_backend::db;
use helpdesk_backend::models::usuarios::{ActiveModel as UsuarioActiveModel, Column as UsuarioColumn, Entity as Usuarios};
use helpdesk_backend::utils::password;

const ADMIN_NOMBRE: &str = "Administrador";
const ADMIN_CORREO: &str = "admin@helpdesk.com";
const ADMIN_TELEFONO: &str = "0000-0000";
const ADMIN_PASSWORD: &str = "admin123"; // mot de passe par défaut, à changer après le premier login

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let db = match db::establish_connection().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    let password_hash = match password::hash_password(ADMIN_PASSWORD) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    // Vérifier si l'admin existe déjà
    let existing = match Usuarios::find()
        .filter(UsuarioColumn::Correo.eq(ADMIN_CORREO))
        .one(&db)
        .await
    {
        Ok(existing) => existing,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    match existing {
        Some(usuario) => {
            println!("⚠️  El administrador ya existe. Actualizando contraseña...");

            let mut active: UsuarioActiveModel = usuario.into();
            active.password_hash = Set(password_hash);
            active.estado = Set("activo".to_string());

            if let Err(e) = active.update(&db).await {
                eprintln!("❌ Error: {}", e);
                std::process::exit(1);
            }

            println!("✅ Contraseña del administrador actualizada");
        }
        None => {
            let nuevo = UsuarioActiveModel {
                nombre_completo: Set(ADMIN_NOMBRE.to_string()),
                correo: Set(ADMIN_CORREO.to_string()),
                telefono: Set(Some(ADMIN_TELEFONO.to_string())),
                rol: Set("Admin".to_string()),
                password_hash: Set(password_hash),
                estado: Set("activo".to_string()),
                ..Default::default()
            };

            match nuevo.insert(&db).await {
                Ok(usuario) => {
                    println!("✅ Administrador creado exitosamente");
                    println!("   ID: {}", usuario.usuario_id);
                }
                Err(e) => {
                    eprintln!("❌ Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    println!("\n📝 Credenciales de acceso:");
    println!("   Correo: {}", ADMIN_CORREO);
    println!("   Password: {}", ADMIN_PASSWORD);
    println!("\n🔗 Ruta de login:");
    println!("   POST http://localhost:8080/auth/login");
}
